//! Project configuration (`lattice.toml`).

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

const CONFIG_FILENAME: &str = "lattice.toml";

/// Resolved project configuration.
///
/// ```toml
/// [project]
/// namespace = "org.acme"
/// entities = "entities"
///
/// [server]
/// url = "http://localhost:9090/"
/// ```
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub namespace: String,
    pub entities_dir: PathBuf,
    pub server_url: Option<Url>,
}

impl ProjectConfig {
    /// Read `lattice.toml` from `root`. Paths in the file are resolved
    /// relative to `root`.
    pub fn read(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILENAME);
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            Error::config(format!("failed to read {}: {err}", path.display()))
        })?;
        let value: toml::Value = contents.parse().map_err(|err| {
            Error::config(format!("failed to parse {}: {err}", path.display()))
        })?;

        let project = value
            .get("project")
            .ok_or_else(|| Error::config("missing [project] section in lattice.toml"))?;
        let namespace = get_string(project, "namespace")?;
        let entities = project
            .get("entities")
            .and_then(|v| v.as_str())
            .unwrap_or("entities");

        let server_url = match value.get("server").and_then(|s| s.get("url")) {
            Some(raw) => {
                let raw = raw
                    .as_str()
                    .ok_or_else(|| Error::config("server.url must be a string"))?;
                Some(Url::parse(raw).map_err(|err| {
                    Error::config(format!("invalid server.url {raw:?}: {err}"))
                })?)
            }
            None => None,
        };

        Ok(Self {
            namespace,
            entities_dir: root.join(entities),
            server_url,
        })
    }

    /// Whether a `lattice.toml` exists under `root`.
    pub fn exists(root: &Path) -> bool {
        root.join(CONFIG_FILENAME).is_file()
    }
}

fn get_string(section: &toml::Value, key: &str) -> Result<String> {
    section
        .get(key)
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
        .ok_or_else(|| Error::config(format!("missing project.{key} in lattice.toml")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_read_full_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lattice.toml"),
            r#"
[project]
namespace = "org.acme"
entities = "schema/entities"

[server]
url = "http://localhost:9090/"
"#,
        )
        .unwrap();

        let config = ProjectConfig::read(dir.path()).unwrap();
        assert_eq!(config.namespace, "org.acme");
        assert_eq!(config.entities_dir, dir.path().join("schema/entities"));
        assert_eq!(
            config.server_url.unwrap().as_str(),
            "http://localhost:9090/"
        );
    }

    #[test]
    fn test_entities_dir_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lattice.toml"),
            "[project]\nnamespace = \"org.acme\"\n",
        )
        .unwrap();
        let config = ProjectConfig::read(dir.path()).unwrap();
        assert_eq!(config.entities_dir, dir.path().join("entities"));
        assert!(config.server_url.is_none());
    }

    #[test]
    fn test_missing_namespace_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lattice.toml"), "[project]\n").unwrap();
        let err = ProjectConfig::read(dir.path()).unwrap_err();
        assert!(err.to_string().contains("project.namespace"));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lattice.toml"),
            "[project]\nnamespace = \"x\"\n[server]\nurl = \"not a url\"\n",
        )
        .unwrap();
        let err = ProjectConfig::read(dir.path()).unwrap_err();
        assert!(err.to_string().contains("server.url"));
    }
}
