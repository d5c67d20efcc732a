//! The shared result display
//!
//! One text region holds the outcome of the latest submission. Every
//! submission takes a ticket when it writes its status text; a result is only
//! written if its ticket is still the latest one, so a slow response can
//! never overwrite the outcome of a later submission.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

/// What the display currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayContent {
    /// Nothing submitted yet
    #[default]
    Empty,
    /// A request is in flight
    Status(&'static str),
    /// 2xx response body
    Success(Value),
    /// Non-2xx response body
    ServerError(Value),
    /// Failure before a JSON response was obtained
    Exception(String),
}

impl DisplayContent {
    /// Render the display text
    pub fn render(&self) -> String {
        match self {
            DisplayContent::Empty => String::new(),
            DisplayContent::Status(text) => (*text).to_string(),
            DisplayContent::Success(body) => format!("Success!\n\n{}", pretty(body)),
            DisplayContent::ServerError(body) => format!("Error:\n\n{}", pretty(body)),
            DisplayContent::Exception(message) => {
                format!("An unexpected error occurred: {}", message)
            }
        }
    }

    /// Whether this is a finished outcome rather than a status or empty
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DisplayContent::Success(_)
                | DisplayContent::ServerError(_)
                | DisplayContent::Exception(_)
        )
    }
}

impl fmt::Display for DisplayContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Two-space indented JSON
fn pretty(body: &Value) -> String {
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

/// Snapshot of the display state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    /// Ticket of the latest submission
    pub ticket: u64,
    /// Number of writes to the display so far
    pub revision: u64,
    pub content: DisplayContent,
}

/// Shared handle to the result display
///
/// Cloning yields another handle to the same region.
#[derive(Debug, Clone)]
pub struct ResultDisplay {
    state: Arc<watch::Sender<DisplayState>>,
}

impl Default for ResultDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultDisplay {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DisplayState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    /// Start a submission: take a new ticket and show its status text
    pub fn begin(&self, status: &'static str) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            state.ticket += 1;
            state.revision += 1;
            state.content = DisplayContent::Status(status);
            ticket = state.ticket;
        });
        ticket
    }

    /// Show a result if `ticket` is still the latest submission.
    ///
    /// Returns false, leaving the display untouched, when a later submission
    /// has started since.
    pub fn complete(&self, ticket: u64, content: DisplayContent) -> bool {
        self.state.send_if_modified(|state| {
            if state.ticket != ticket {
                return false;
            }
            state.revision += 1;
            state.content = content;
            true
        })
    }

    /// Current content
    pub fn content(&self) -> DisplayContent {
        self.state.borrow().content.clone()
    }

    /// Current rendered text
    pub fn text(&self) -> String {
        self.state.borrow().content.render()
    }

    /// Full state snapshot
    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Watch for display changes
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_success() {
        let content = DisplayContent::Success(json!({"id": 1}));
        assert_eq!(content.render(), "Success!\n\n{\n  \"id\": 1\n}");
    }

    #[test]
    fn test_render_server_error() {
        let content = DisplayContent::ServerError(json!({"error": "bad"}));
        assert_eq!(content.render(), "Error:\n\n{\n  \"error\": \"bad\"\n}");
    }

    #[test]
    fn test_render_exception() {
        let content = DisplayContent::Exception("Network down".to_string());
        assert_eq!(
            content.render(),
            "An unexpected error occurred: Network down"
        );
    }

    #[test]
    fn test_render_keeps_server_key_order() {
        let body: Value =
            serde_json::from_str(r#"{"message": "ok", "file_path": "out/DM.csv"}"#).unwrap();
        assert_eq!(
            DisplayContent::Success(body).render(),
            "Success!\n\n{\n  \"message\": \"ok\",\n  \"file_path\": \"out/DM.csv\"\n}"
        );
    }

    #[test]
    fn test_render_non_object_body() {
        assert_eq!(
            DisplayContent::ServerError(json!([1, "two"])).render(),
            "Error:\n\n[\n  1,\n  \"two\"\n]"
        );
        assert_eq!(DisplayContent::Success(json!(null)).render(), "Success!\n\nnull");
    }

    #[test]
    fn test_begin_and_complete() {
        let display = ResultDisplay::new();
        assert_eq!(display.content(), DisplayContent::Empty);

        let ticket = display.begin("Generating...");
        assert_eq!(display.text(), "Generating...");

        assert!(display.complete(ticket, DisplayContent::Success(json!({}))));
        assert_eq!(display.text(), "Success!\n\n{}");
        assert_eq!(display.snapshot().revision, 2);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let display = ResultDisplay::new();
        let first = display.begin("Generating...");
        let second = display.begin("Generating package...");

        assert!(!display.complete(first, DisplayContent::Exception("late".into())));
        assert_eq!(display.text(), "Generating package...");

        assert!(display.complete(second, DisplayContent::Success(json!({"ok": true}))));
        assert!(display.content().is_terminal());
    }

    #[test]
    fn test_clones_share_state() {
        let display = ResultDisplay::new();
        let other = display.clone();
        other.begin("Generating...");
        assert_eq!(display.text(), "Generating...");
    }

    #[tokio::test]
    async fn test_subscribe_sees_updates() {
        let display = ResultDisplay::new();
        let mut rx = display.subscribe();

        let ticket = display.begin("Generating...");
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().content,
            DisplayContent::Status("Generating...")
        );

        display.complete(ticket, DisplayContent::Exception("boom".into()));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().content.is_terminal());
    }
}
