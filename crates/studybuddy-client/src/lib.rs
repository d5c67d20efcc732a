//! Study Buddy form submitter
//!
//! Captures the field values of the dataset generation forms, coerces them
//! into the JSON bodies the backend expects, posts them, and renders the
//! outcome into a shared result display.
//!
//! # Example
//!
//! ```rust,no_run
//! use studybuddy_client::{
//!     FormPayload, FormSubmitter, ResultDisplay, StudyBuddyClient, SubmissionEvent,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StudyBuddyClient::new("http://localhost:8000")?;
//!     let display = ResultDisplay::new();
//!     let submitter = FormSubmitter::new(client, display.clone());
//!
//!     let mut event = SubmissionEvent::new(
//!         FormPayload::new()
//!             .with_field("num_subjects", "20")
//!             .with_field("therapeutic_area", "Oncology")
//!             .with_field("domains", "DM, AE, VS")
//!             .with_field("study_story", "none")
//!             .with_field("output_format", "csv"),
//!     );
//!
//!     submitter.handle_raw_dataset_submit(&mut event).await;
//!     println!("{}", display.text());
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides a scripted [`testing::FakeTransport`] for
//! exercising the submitter without a network, and a
//! [`testing::TestServer`] that serves an axum router on a local port:
//!
//! ```rust,ignore
//! use studybuddy_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let submitter = FormSubmitter::new(server.client.clone(), ResultDisplay::new());
//! ```

mod client;
mod display;
mod error;
mod form;
mod payload;
mod submitter;
pub mod testing;
mod transport;
mod types;

pub use client::{StudyBuddyClient, DEFAULT_CONNECT_TIMEOUT};
pub use display::{DisplayContent, DisplayState, ResultDisplay};
pub use error::{Result, StudyBuddyError};
pub use form::{FormKind, SubmissionRequest};
pub use payload::{parse_num_subjects, split_domains, FormPayload, DOMAINS, NUM_SUBJECTS};
pub use submitter::{FormSubmitter, SubmissionEvent, SubmissionState};
pub use transport::{Transport, TransportResponse};
pub use types::*;
