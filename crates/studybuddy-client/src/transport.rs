//! Transport seam between the submitter and the network

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A response whose body parsed as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to an endpoint and parses the JSON reply.
///
/// Implementations return `Ok` for any response whose body is JSON, whatever
/// its status. Failing to reach the server or to parse the body is an `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse> {
        (**self).post_json(path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_range() {
        assert!(TransportResponse::new(200, json!({})).is_success());
        assert!(TransportResponse::new(201, json!({})).is_success());
        assert!(TransportResponse::new(299, json!({})).is_success());
        assert!(!TransportResponse::new(199, json!({})).is_success());
        assert!(!TransportResponse::new(300, json!({})).is_success());
        assert!(!TransportResponse::new(422, json!({})).is_success());
        assert!(!TransportResponse::new(500, json!({})).is_success());
    }
}
