//! Study Buddy HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, StudyBuddyError};
use crate::transport::{Transport, TransportResponse};

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the Study Buddy generation backend
///
/// Posts JSON bodies to the backend and parses the JSON reply regardless of
/// the response status. Only connecting is time-limited by default: once
/// connected, a slow generation request is waited on until it resolves.
#[derive(Debug, Clone)]
pub struct StudyBuddyClient {
    client: Client,
    base_url: Url,
}

impl StudyBuddyClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:8000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, None, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    ///
    /// `timeout` bounds the whole request and is off when `None`.
    pub fn with_config(
        base_url: &str,
        timeout: Option<Duration>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut builder = Client::builder().connect_timeout(connect_timeout);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check whether the backend answers its root page with a 2xx status
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<bool> {
        let url = self.base_url.join("/")?;
        let response = self.client.get(url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl Transport for StudyBuddyClient {
    #[instrument(skip(self, body))]
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse> {
        let url = self.base_url.join(path)?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = serde_json::from_str(&text)
            .map_err(|e| StudyBuddyError::ParseError(e.to_string()))?;

        debug!(status = status.as_u16(), "Received response");
        Ok(TransportResponse::new(status.as_u16(), body))
    }
}
