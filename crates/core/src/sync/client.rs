//! HTTP client for the schema service.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

use lattice_idl::StructureRecord;

use crate::error::{Error, Result};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Typed client for the schema service's structure endpoints.
///
/// Structures are keyed by their lowercase `namespace.name` identifier.
/// Transport only: retries, auth, and caching live elsewhere.
#[derive(Debug, Clone)]
pub struct SchemaServiceClient {
    base_url: Url,
    http: reqwest::Client,
}

impl SchemaServiceClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, suffix: &str) -> Result<Url> {
        self.base_url
            .join(&format!("api/structures/{suffix}"))
            .map_err(|err| Error::sync(format!("invalid service URL: {err}")))
    }

    /// Fetch a structure by id. `Ok(None)` when the service has no record.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<StructureRecord>> {
        let url = self.endpoint(id)?;
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(error_from_response(status, response).await),
        }
    }

    /// Create a new structure record.
    pub async fn create(&self, record: &StructureRecord) -> Result<StructureRecord> {
        let url = self
            .base_url
            .join("api/structures")
            .map_err(|err| Error::sync(format!("invalid service URL: {err}")))?;
        debug!("POST {url}");
        let response = self.http.post(url).json(record).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response.status(), response).await);
        }
        Ok(response.json().await?)
    }

    /// Replace an existing structure's definition.
    pub async fn save(&self, record: &StructureRecord) -> Result<StructureRecord> {
        let url = self.endpoint(&record.id)?;
        debug!("PUT {url}");
        let response = self.http.put(url).json(record).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response.status(), response).await);
        }
        Ok(response.json().await?)
    }

    /// Publish a structure, making its items writable.
    pub async fn publish(&self, id: &str) -> Result<()> {
        self.post_action(id, "publish").await
    }

    /// Unpublish a structure. Destructive: the service drops stored items.
    pub async fn unpublish(&self, id: &str) -> Result<()> {
        self.post_action(id, "unpublish").await
    }

    /// Delete a structure record outright.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let url = self.endpoint(id)?;
        debug!("DELETE {url}");
        let response = self.http.delete(url).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response.status(), response).await);
        }
        Ok(())
    }

    async fn post_action(&self, id: &str, action: &str) -> Result<()> {
        let url = self.endpoint(&format!("{id}/{action}"))?;
        debug!("POST {url}");
        let response = self.http.post(url).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response.status(), response).await);
        }
        Ok(())
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response) -> Error {
    let body = response.text().await.unwrap_or_default();
    let snippet = body.chars().take(200).collect::<String>();
    if snippet.is_empty() {
        Error::sync(format!("service returned {status}"))
    } else {
        Error::sync(format!("service returned {status}: {snippet}"))
    }
}
