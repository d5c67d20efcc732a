//! Test utilities for studybuddy-client
//!
//! [`TestServer`] runs an axum router on an ephemeral port with a real
//! client pointed at it. [`FakeTransport`] replaces the network entirely with
//! scripted replies.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::display::ResultDisplay;
use crate::error::{Result, StudyBuddyError};
use crate::transport::{Transport, TransportResponse};
use crate::StudyBuddyClient;

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: StudyBuddyClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Create a new test server from an axum Router
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{routing::post, Json, Router};
    /// use studybuddy_client::testing::TestServer;
    ///
    /// let router = Router::new().route(
    ///     "/api/generate-synthetic-data",
    ///     post(|| async { Json(serde_json::json!({"message": "ok"})) }),
    /// );
    /// let server = TestServer::start(router).await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_with_timeout(router, None, Duration::from_secs(2)).await
    }

    /// Create a new test server with custom timeouts
    ///
    /// `timeout` bounds the whole request; `None` waits for the handler.
    pub async fn start_with_timeout<S>(
        router: axum::Router<S>,
        timeout: Option<Duration>,
        connect_timeout: Duration,
    ) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let base_url = format!("http://{}", addr);
        let client = StudyBuddyClient::with_config(&base_url, timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get a reference to the client
    pub fn client(&self) -> &StudyBuddyClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A scripted reply for [`FakeTransport`]
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// JSON response with the given status
    Respond(TransportResponse),
    /// Transport failure with the given message
    Fail(String),
    /// Wait, then produce the inner reply
    Delayed(Duration, Box<FakeReply>),
}

impl FakeReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::Respond(TransportResponse::new(status, body))
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Self::Delayed(delay, Box::new(self))
    }
}

/// A request seen by [`FakeTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

/// In-memory transport with per-endpoint scripted replies
///
/// Replies for a path are consumed in order. A request to a path with no
/// remaining reply fails. When observing a display, the display text at the
/// moment of each request is recorded.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, VecDeque<FakeReply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    observed: Mutex<Vec<String>>,
    display: Option<ResultDisplay>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `path`
    pub fn reply(self, path: &str, reply: FakeReply) -> Self {
        self.push_reply(path, reply);
        self
    }

    /// Queue a reply for `path` on a shared transport
    pub fn push_reply(&self, path: &str, reply: FakeReply) {
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Record the display text whenever a request is sent
    pub fn observing(mut self, display: ResultDisplay) -> Self {
        self.display = Some(display);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Display text seen at each request
    pub fn observed(&self) -> Vec<String> {
        self.observed.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse> {
        if let Some(display) = &self.display {
            self.observed.lock().push(display.text());
        }
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            body: body.clone(),
        });

        let reply = self
            .replies
            .lock()
            .get_mut(path)
            .and_then(VecDeque::pop_front);

        let mut reply = reply.ok_or_else(|| {
            StudyBuddyError::Transport(format!("no reply scripted for {}", path))
        })?;

        loop {
            match reply {
                FakeReply::Respond(response) => return Ok(response),
                FakeReply::Fail(message) => return Err(StudyBuddyError::Transport(message)),
                FakeReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

/// Wait for a condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}
