//! HTTP object store accessor.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::{BackingStore, Result, StoreError};

// == HTTP Store ==
/// Fetches objects from an HTTP object store laid out as `{base_url}/{key}`.
///
/// `HEAD` answers existence checks, `GET` downloads.
#[derive(Debug, Clone)]
pub struct HttpBackingStore {
    client: Client,
    base_url: String,
}

impl HttpBackingStore {
    /// Creates an accessor whose requests are bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the object URL, percent-encoding each key segment.
    pub fn object_url(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }
}

// == Error Mapping ==
/// Maps a non-success status to the accessor error taxonomy.
fn status_error(key: &str, status: StatusCode) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(key.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::AccessDenied(key.to_string())
        }
        other => StoreError::Transport(format!("Object store returned status {}", other)),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

// == BackingStore Implementation ==
#[async_trait]
impl BackingStore for HttpBackingStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let url = self.object_url(key);
        debug!(url = %url, "Checking object existence");

        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error(key, status)),
        }
    }

    async fn download_bytes(&self, key: &str) -> Result<Bytes> {
        let url = self.object_url(key);
        debug!(url = %url, "Downloading object");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to download object");
            return Err(status_error(key, response.status()));
        }

        let data = response.bytes().await.map_err(transport_error)?;
        debug!(size = data.len(), url = %url, "Downloaded object");

        Ok(data)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpBackingStore {
        HttpBackingStore::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let store = HttpBackingStore::new("http://store.local/bucket/", Duration::from_secs(1)).unwrap();

        assert_eq!(store.base_url(), "http://store.local/bucket");
        assert_eq!(
            store.object_url("hero/my sunset.jpg"),
            "http://store.local/bucket/hero/my%20sunset.jpg"
        );
    }

    #[tokio::test]
    async fn test_exists_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/hero/sunset.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/private/raw.jpg"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/broken.jpg"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let store = store_for(&server);

        assert!(store.exists("hero/sunset.jpg").await.unwrap());
        // Unmatched requests get 404 from the mock server
        assert!(!store.exists("hero/missing.jpg").await.unwrap());
        assert!(matches!(
            store.exists("private/raw.jpg").await,
            Err(StoreError::AccessDenied(_))
        ));
        assert!(matches!(
            store.exists("broken.jpg").await,
            Err(StoreError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_download_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hero/sunset.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 2048]))
            .mount(&server)
            .await;
        let store = store_for(&server);

        let data = store.download_bytes("hero/sunset.jpg").await.unwrap();
        assert_eq!(data.len(), 2048);

        assert!(matches!(
            store.download_bytes("hero/missing.jpg").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let store = HttpBackingStore::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        assert!(matches!(
            store.exists("a.jpg").await,
            Err(StoreError::Transport(_))
        ));
    }
}
