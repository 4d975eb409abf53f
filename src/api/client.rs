use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;

use super::types::{EntryFilter, EntryList};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur talking to the Miniflux API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Entries payload was not valid JSON for the expected shape
    #[error("Invalid entries payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two remote operations the export pipelines need.
#[allow(async_fn_in_trait)]
pub trait FeedReader {
    /// Fetches the server's OPML subscription export as raw bytes.
    async fn export_opml(&self) -> Result<Vec<u8>, ApiError>;

    /// Fetches entries matching the filter, in server order.
    async fn entries(&self, filter: &EntryFilter) -> Result<EntryList, ApiError>;
}

/// HTTP client for a Miniflux server.
///
/// Authenticates with an `X-Auth-Token` header when an API key is configured,
/// otherwise with HTTP basic auth.
pub struct MinifluxClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: SecretString,
    api_key: Option<SecretString>,
}

impl MinifluxClient {
    /// Creates a client for the given server address.
    pub fn new(host: &str, username: &str, password: &str, api_key: Option<&str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: host.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
            api_key: api_key.map(|key| SecretString::from(key.to_string())),
        }
    }

    fn authenticate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("X-Auth-Token", key.expose_secret()),
            None => request.basic_auth(&self.username, Some(self.password.expose_secret())),
        }
    }

    async fn get_bytes(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let request = self.authenticate(request);

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request.send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

impl FeedReader for MinifluxClient {
    async fn export_opml(&self) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/v1/export", self.base_url);
        self.get_bytes(&url, &[]).await
    }

    async fn entries(&self, filter: &EntryFilter) -> Result<EntryList, ApiError> {
        let url = format!("{}/v1/entries", self.base_url);
        let bytes = self.get_bytes(&url, &filter.to_query()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Reads a response body with a size cap to bound memory use.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
