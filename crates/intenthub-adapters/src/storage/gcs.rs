//! Cloud Storage JSON API backend (`storage/v1`).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{ObjectMeta, ObjectStore};
use crate::error::{AdapterError, Result};
use crate::query::google_error_message;

/// Public root of the Cloud Storage JSON API.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

const SERVICE: &str = "storage";

/// Connection settings for [`GcsClient`].
#[derive(Debug, Clone)]
pub struct GcsConfig {
    pub endpoint: String,
    pub project_id: String,
    pub bucket: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl GcsConfig {
    pub fn new(project_id: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_STORAGE_ENDPOINT.into(),
            project_id: project_id.into(),
            bucket: bucket.into(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// REST client for one Cloud Storage bucket.
pub struct GcsClient {
    config: GcsConfig,
    client: reqwest::Client,
}

impl GcsClient {
    pub fn new(config: GcsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("IntentHub/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdapterError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// `<endpoint>/<segments...>`; each segment is percent-encoded, so object
    /// names containing `/` stay a single segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|e| {
            AdapterError::Config(format!("invalid endpoint `{}`: {e}", self.config.endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|_| AdapterError::Config("endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|source| AdapterError::Transport {
            service: SERVICE,
            source,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.send_raw(builder).await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdapterError::Api {
        service: SERVICE,
        status: status.as_u16(),
        message: google_error_message(&body),
    })
}

fn transport(source: reqwest::Error) -> AdapterError {
    AdapterError::Transport {
        service: SERVICE,
        source,
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
    /// The JSON API encodes `uint64` as a decimal string.
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
}

impl From<ObjectResource> for ObjectMeta {
    fn from(item: ObjectResource) -> Self {
        Self {
            name: item.name,
            size: item.size.and_then(|s| s.parse().ok()).unwrap_or(0),
            updated: item.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Store impl
// ---------------------------------------------------------------------------

#[async_trait]
impl ObjectStore for GcsClient {
    fn bucket(&self) -> &str {
        &self.config.bucket
    }

    async fn bucket_exists(&self) -> Result<bool> {
        let url = self.url(&["storage", "v1", "b", &self.config.bucket])?;
        let response = self.send_raw(self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    async fn create_bucket(&self, location: &str) -> Result<()> {
        let mut url = self.url(&["storage", "v1", "b"])?;
        url.query_pairs_mut()
            .append_pair("project", &self.config.project_id);
        let body = json!({ "name": self.config.bucket, "location": location });
        self.send(self.request(Method::POST, url).json(&body)).await?;
        debug!(bucket = %self.config.bucket, location, "bucket created");
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.url(&["storage", "v1", "b", &self.config.bucket, "o"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("prefix", prefix);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }
            let page: ObjectList = self
                .send(self.request(Method::GET, url))
                .await?
                .json()
                .await
                .map_err(transport)?;
            objects.extend(page.items.into_iter().map(ObjectMeta::from));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(bucket = %self.config.bucket, prefix, count = objects.len(), "objects listed");
        Ok(objects)
    }

    async fn put_object(&self, name: &str, content: &str) -> Result<()> {
        let mut url = self.url(&["upload", "storage", "v1", "b", &self.config.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", name);
        let request = self
            .request(Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(content.to_string());
        self.send(request).await?;
        debug!(bucket = %self.config.bucket, object = name, bytes = content.len(), "object uploaded");
        Ok(())
    }

    async fn get_object(&self, name: &str) -> Result<Option<String>> {
        let mut url = self.url(&["storage", "v1", "b", &self.config.bucket, "o", name])?;
        url.query_pairs_mut().append_pair("alt", "media");
        let response = self.send_raw(self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = check_status(response).await?.text().await.map_err(transport)?;
        debug!(bucket = %self.config.bucket, object = name, chars = text.len(), "object downloaded");
        Ok(Some(text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_are_one_encoded_segment() {
        let mut config = GcsConfig::new("demo", "demo-rag-documents");
        config.endpoint = "http://127.0.0.1:4443/".into();
        let client = GcsClient::new(config).unwrap();
        let url = client
            .url(&["storage", "v1", "b", "demo-rag-documents", "o", "contracts/contract_001.txt"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4443/storage/v1/b/demo-rag-documents/o/contracts%2Fcontract_001.txt"
        );
    }

    #[test]
    fn object_resource_parses_string_size() {
        let item: ObjectResource = serde_json::from_value(json!({
            "name": "a.txt",
            "size": "42",
            "updated": "2024-01-15T10:00:00.000Z"
        }))
        .unwrap();
        let meta = ObjectMeta::from(item);
        assert_eq!(meta.size, 42);
        assert_eq!(
            meta.updated.unwrap().to_rfc3339(),
            "2024-01-15T10:00:00+00:00"
        );
    }
}
