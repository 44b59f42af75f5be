//! Workflow state machine
//!
//! The single source of truth for the client workflow: the selected file,
//! its encoded payload, the remote result, the in-flight flag, and the
//! user-facing error message. All writes go through the transition methods
//! here; every other component only reads.
//!
//! States are derived from field presence rather than stored, so the
//! invariants (payload nested inside the file's lifetime, result and error
//! cleared whenever the file changes) cannot drift from the data.

use crate::error::{BgStripError, Result};
use crate::types::{EncodedPayload, FileId, SelectedFile};
use tracing::{debug, info};

/// The visible stage of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No file selected
    Idle,
    /// File present, nothing in flight, no result or error yet
    Ready,
    /// A removal request is in flight
    Processing,
    /// A result reference is available
    Done,
    /// The last request failed; file and payload survive for resubmission
    Failed,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Ready => write!(f, "ready"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Owner of all mutable workflow state.
///
/// Designed for a single driving control flow: transitions triggered by
/// asynchronous completions are applied in the order the driver observes
/// them, and stale completions are recognized by their [`FileId`] tag and
/// dropped.
#[derive(Debug, Default)]
pub struct Workflow {
    file: Option<SelectedFile>,
    file_id: Option<FileId>,
    payload: Option<EncodedPayload>,
    result: Option<String>,
    error: Option<String>,
    in_flight: bool,
    next_id: u64,
}

impl Workflow {
    /// Create a workflow in the initial `Idle` state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a validated file as the current selection.
    ///
    /// Performs a full reset first (deleting any previous file, payload,
    /// result, and error), then returns the identity tag asynchronous
    /// completions for this file must carry.
    pub fn select(&mut self, file: SelectedFile) -> FileId {
        self.reset();
        let id = self.mint_id();
        info!(name = %file.name, size = file.size(), %id, "file selected");
        self.file = Some(file);
        self.file_id = Some(id);
        id
    }

    /// Record a validation rejection.
    ///
    /// Only the error message changes; a previously selected file and its
    /// result are deliberately left untouched.
    pub fn reject<S: Into<String>>(&mut self, message: S) {
        let message = message.into();
        debug!(%message, "intake rejected");
        self.error = Some(message);
    }

    /// Attach the encoded payload produced for `id`.
    ///
    /// A completion for a file that is no longer current is dropped.
    pub fn attach_payload(&mut self, id: FileId, payload: EncodedPayload) {
        if self.file_id != Some(id) {
            debug!(%id, "dropping stale encode completion");
            return;
        }
        debug!(%id, "payload attached");
        self.payload = Some(payload);
    }

    /// Begin a submission, moving `Ready`/`Failed` into `Processing`.
    ///
    /// Returns the identity tag and payload the invoker must carry. The
    /// previous error and result are cleared here: submitting is the user
    /// action that starts a fresh attempt.
    ///
    /// # Errors
    /// - [`BgStripError::InvalidState`] when no file is selected, encoding
    ///   has not completed, or a request is already in flight
    pub fn begin_submission(&mut self) -> Result<(FileId, EncodedPayload)> {
        if self.in_flight {
            return Err(BgStripError::invalid_state("a request is already in flight"));
        }
        let id = self
            .file_id
            .ok_or_else(|| BgStripError::invalid_state("no file selected"))?;
        let payload = self
            .payload
            .clone()
            .ok_or_else(|| BgStripError::invalid_state("encoding has not completed"))?;

        info!(%id, "submission started");
        self.error = None;
        self.result = None;
        self.in_flight = true;
        Ok((id, payload))
    }

    /// Apply the terminal outcome of the submission tagged `id`.
    ///
    /// Success installs the result reference; failure installs the error
    /// message. Either way the in-flight flag is cleared. Outcomes for a
    /// file that is no longer current are dropped, which also leaves the
    /// in-flight flag alone, since a reset already cleared it.
    pub fn complete_submission(
        &mut self,
        id: FileId,
        outcome: std::result::Result<String, String>,
    ) {
        if self.file_id != Some(id) {
            debug!(%id, "dropping stale submission outcome");
            return;
        }
        self.in_flight = false;
        match outcome {
            Ok(reference) => {
                info!(%id, "submission succeeded");
                self.error = None;
                self.result = Some(reference);
            },
            Err(message) => {
                info!(%id, %message, "submission failed");
                self.result = None;
                self.error = Some(message);
            },
        }
    }

    /// Delete the current file, returning to `Idle`.
    ///
    /// Equivalent to the state at initial load regardless of the prior
    /// stage. Any still-running encode or request for the deleted file
    /// will be recognized as stale by its tag and dropped on completion.
    pub fn delete(&mut self) {
        if self.file.is_some() {
            info!("selection deleted");
        }
        self.reset();
    }

    /// The current visible state, derived from field presence
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        if self.file.is_none() {
            WorkflowState::Idle
        } else if self.in_flight {
            WorkflowState::Processing
        } else if self.result.is_some() {
            WorkflowState::Done
        } else if self.error.is_some() {
            WorkflowState::Failed
        } else {
            WorkflowState::Ready
        }
    }

    /// The currently selected file, if any
    #[must_use]
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Identity tag of the current file, if any
    #[must_use]
    pub fn current_file_id(&self) -> Option<FileId> {
        self.file_id
    }

    /// The encoded payload, once encoding has completed
    #[must_use]
    pub fn payload(&self) -> Option<&EncodedPayload> {
        self.payload.as_ref()
    }

    /// The result reference from a successful submission, if any
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// The user-facing error message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is currently in flight
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the submit control should be offered and enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && self.payload.is_some() && !self.in_flight
    }

    /// Whether the download control should be offered
    #[must_use]
    pub fn can_export(&self) -> bool {
        self.result.is_some()
    }

    fn reset(&mut self) {
        self.file = None;
        self.file_id = None;
        self.payload = None;
        self.result = None;
        self.error = None;
        self.in_flight = false;
    }

    fn mint_id(&mut self) -> FileId {
        self.next_id += 1;
        FileId::new(self.next_id)
    }
}
