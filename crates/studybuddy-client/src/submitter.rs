//! Form submission handlers
//!
//! Each handler runs one submission to completion:
//!
//! ```text
//! Idle -> Submitting -> Success | ServerError | ClientException
//! ```
//!
//! Idle and Submitting are only ever visible on the display, as
//! [`DisplayContent::Empty`] and [`DisplayContent::Status`]; a handler returns
//! once it has reached a terminal state, so [`SubmissionState`] has no
//! variants for them.
//!
//! The status text is on the display before the network call starts. A
//! submission whose result arrives after a newer submission has begun ends in
//! [`SubmissionState::Superseded`] and leaves the display alone.

use tracing::{debug, instrument, warn};

use crate::display::{DisplayContent, ResultDisplay};
use crate::form::FormKind;
use crate::payload::FormPayload;
use crate::transport::Transport;

/// A form submission with the field values captured at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEvent {
    fields: FormPayload,
    default_prevented: bool,
}

impl SubmissionEvent {
    pub fn new(fields: FormPayload) -> Self {
        Self {
            fields,
            default_prevented: false,
        }
    }

    /// Suppress the default navigation for this submission
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn fields(&self) -> &FormPayload {
        &self.fields
    }
}

impl From<FormPayload> for SubmissionEvent {
    fn from(fields: FormPayload) -> Self {
        Self::new(fields)
    }
}

/// Terminal state of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// 2xx response rendered
    Success,
    /// Non-2xx response rendered
    ServerError,
    /// Coercion, transport or parse failure rendered
    ClientException,
    /// A later submission started before this one resolved
    Superseded,
}

/// Submits forms through a [`Transport`] and renders outcomes to a shared
/// [`ResultDisplay`]
pub struct FormSubmitter<T> {
    transport: T,
    display: ResultDisplay,
}

impl<T: Transport> FormSubmitter<T> {
    pub fn new(transport: T, display: ResultDisplay) -> Self {
        Self { transport, display }
    }

    pub fn display(&self) -> &ResultDisplay {
        &self.display
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submit the synthetic data form
    pub async fn handle_synthetic_submit(&self, event: &mut SubmissionEvent) -> SubmissionState {
        self.submit(FormKind::SyntheticData, event).await
    }

    /// Submit the raw dataset package form
    pub async fn handle_raw_dataset_submit(&self, event: &mut SubmissionEvent) -> SubmissionState {
        self.submit(FormKind::RawDatasetPackage, event).await
    }

    /// Submit the analysis code form
    pub async fn handle_analysis_code_submit(
        &self,
        event: &mut SubmissionEvent,
    ) -> SubmissionState {
        self.submit(FormKind::AnalysisCode, event).await
    }

    /// Run one submission of `kind` to completion
    #[instrument(skip(self, event), fields(form = %kind))]
    pub async fn submit(&self, kind: FormKind, event: &mut SubmissionEvent) -> SubmissionState {
        event.prevent_default();
        let ticket = self.display.begin(kind.status_text());
        debug!(ticket, "Submitting to {}", kind.endpoint());

        let (state, content) = match kind.build_request(event.fields()) {
            Ok(request) => match self.transport.post_json(request.endpoint(), &request.body).await
            {
                Ok(response) if response.is_success() => (
                    SubmissionState::Success,
                    DisplayContent::Success(response.body),
                ),
                Ok(response) => {
                    warn!(status = response.status, "Server reported an error");
                    (
                        SubmissionState::ServerError,
                        DisplayContent::ServerError(response.body),
                    )
                }
                Err(e) => {
                    warn!("Submission failed: {}", e);
                    (
                        SubmissionState::ClientException,
                        DisplayContent::Exception(e.to_string()),
                    )
                }
            },
            Err(e) => {
                warn!("Rejected form values: {}", e);
                (
                    SubmissionState::ClientException,
                    DisplayContent::Exception(e.to_string()),
                )
            }
        };

        if self.display.complete(ticket, content) {
            state
        } else {
            debug!(ticket, "Discarding result of superseded submission");
            SubmissionState::Superseded
        }
    }
}
