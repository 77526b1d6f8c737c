//! HTTP implementation of the remote collection client
//!
//! JSON over plain HTTP. Any non-2xx status is a failure; the status code is
//! kept for logging but callers treat every failure the same way.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::RemoteCollectionClient;
use crate::error::RemoteError;
use crate::models::{Item, ItemId, NewItem};

/// Default API server
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Path segments of the collection resource, relative to the API server
const TASKS_PATH: [&str; 2] = ["todo", "tasks"];

/// Client for the task collection REST API
#[derive(Debug, Clone)]
pub struct HttpCollectionClient {
    client: Client,
    base: Url,
    base_url: String,
}

impl HttpCollectionClient {
    /// Create a client for the API server at `base_url`
    ///
    /// A trailing `/` on the base URL is ignored.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let base =
            Url::parse(&base_url).map_err(|_| RemoteError::InvalidBaseUrl(base_url.clone()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(RemoteError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder()
            .user_agent(concat!("todo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RemoteError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base,
            base_url,
        })
    }

    /// The API server this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection URL with `segments` appended, each percent-encoded as a
    /// single path segment, and a trailing `/`
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(TASKS_PATH)
                .extend(segments)
                .push("");
        }
        url.into()
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|source| RemoteError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        debug!("{} -> {}", url, status.as_u16());

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            })
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        url: &str,
        response: Response,
    ) -> Result<T, RemoteError> {
        let text = response
            .text()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl RemoteCollectionClient for HttpCollectionClient {
    async fn list(&self) -> Result<Vec<Item>, RemoteError> {
        let url = self.url(&[]);
        let response = self.send(&url, self.client.get(&url)).await?;
        Self::parse_json(&url, response).await
    }

    async fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
        let url = self.url(&["add"]);
        let response = self.send(&url, self.client.post(&url).json(item)).await?;
        Self::parse_json(&url, response).await
    }

    async fn toggle(&self, id: &ItemId) -> Result<Item, RemoteError> {
        let url = self.url(&["toggle", &id.to_string()]);
        let response = self.send(&url, self.client.post(&url)).await?;
        Self::parse_json(&url, response).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        let url = self.url(&["delete", &id.to_string()]);
        // Response body is ignored
        self.send(&url, self.client.delete(&url)).await?;
        Ok(())
    }
}
