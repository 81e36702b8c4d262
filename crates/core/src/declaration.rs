//! Source type declarations: the input side of the conversion engine.
//!
//! Declarations are authored locally as JSON documents (one file per module,
//! each holding a single declaration or an array of them). Parsing host-source
//! languages into this shape is a front-end concern and stays outside this
//! crate; the engine only ever sees this graph.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A declared type, discriminated by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDeclaration {
    Primitive {
        primitive: PrimitiveKind,
    },
    Array {
        element: Box<TypeDeclaration>,
    },
    Record {
        name: String,
        members: Vec<MemberDeclaration>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<Tag>,
    },
    Enum {
        name: String,
        values: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<Tag>,
    },
    Union {
        alternatives: Vec<TypeDeclaration>,
    },
    /// Function signatures appear in source modules but have no schema
    /// representation; converting one is an error.
    Function {
        name: String,
    },
}

/// A named member of a record declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    pub declaration: TypeDeclaration,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// A declarative tag: a name plus at most one positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    pub fn with_argument(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument.into()),
        }
    }
}

impl TypeDeclaration {
    /// Declared name, where the kind has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeDeclaration::Record { name, .. }
            | TypeDeclaration::Enum { name, .. }
            | TypeDeclaration::Function { name } => Some(name),
            _ => None,
        }
    }

    /// Tags attached at the declaration level.
    pub fn tags(&self) -> &[Tag] {
        match self {
            TypeDeclaration::Record { tags, .. } | TypeDeclaration::Enum { tags, .. } => tags,
            _ => &[],
        }
    }

    /// First tag with the given name, if present.
    pub fn tag(&self, tag_name: &str) -> Option<&Tag> {
        self.tags().iter().find(|t| t.name == tag_name)
    }

    /// Short human rendering used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TypeDeclaration::Primitive { primitive } => {
                format!("primitive({})", primitive.wire_name())
            }
            TypeDeclaration::Array { .. } => "array".to_string(),
            TypeDeclaration::Record { name, members, .. } => {
                format!("record {name} ({} members)", members.len())
            }
            TypeDeclaration::Enum { name, values, .. } => {
                format!("enum {name} ({} values)", values.len())
            }
            TypeDeclaration::Union { alternatives } => {
                format!("union ({} alternatives)", alternatives.len())
            }
            TypeDeclaration::Function { name } => format!("function {name}"),
        }
    }
}

/// Scalar kinds a declaration may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Int,
    Long,
    Short,
    Float,
    Double,
    Boolean,
    Byte,
    Char,
    Date,
}

impl PrimitiveKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Date => "date",
        }
    }
}

/// One declaration document: either a single declaration or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeclarationDocument {
    Many(Vec<TypeDeclaration>),
    One(TypeDeclaration),
}

/// Load every `*.json` declaration document under `dir`, sorted by path for
/// deterministic ordering.
pub fn load_declaration_dir(dir: &Path) -> Result<Vec<TypeDeclaration>> {
    if !dir.is_dir() {
        return Err(Error::config(format!(
            "entities directory {} does not exist",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().is_some_and(|ext| ext == "json")
        })
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let mut declarations = Vec::new();
    for path in paths {
        debug!("Loading declaration document {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        let document: DeclarationDocument = serde_json::from_str(&contents).map_err(|err| {
            Error::config(format!(
                "failed to parse declaration document {}: {err}",
                path.display()
            ))
        })?;
        match document {
            DeclarationDocument::Many(mut decls) => declarations.append(&mut decls),
            DeclarationDocument::One(decl) => declarations.push(decl),
        }
    }
    Ok(declarations)
}
