#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # bgstrip
//!
//! A client-side workflow for remote background removal services. The crate
//! validates a single selected image, encodes it for transport, submits one
//! request to an opaque removal endpoint, and tracks the request lifecycle
//! through an explicit state machine (`Idle → Ready → Processing →
//! Done/Failed`) before exporting the result locally.
//!
//! ## Features
//!
//! - **Intake validation**: single-file policy, JPEG/PNG only, configurable
//!   size ceiling with a message that always matches the enforced limit
//! - **Transport encoding**: data-URI base64 payloads derived 1:1 from the
//!   selected file
//! - **Explicit state machine**: one owner for all mutable workflow state,
//!   with stale async completions discarded by file-identity tags
//! - **Opaque service boundary**: `RemovalService` trait with an HTTP
//!   implementation; responses are parsed defensively
//! - **Result export**: URL or inline data-URI references saved to a local
//!   file
//! - **CLI Integration**: optional command-line driver (enable with the
//!   `cli` feature)
//!
//! ## Quick Start
//!
//! ### One-shot processing
//!
//! ```rust,no_run
//! use bgstrip::{remove_background_from_path, ClientConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .endpoint("http://localhost:3000/api/replicate")
//!     .build()?;
//! let reference = remove_background_from_path("input.jpg", &config).await?;
//! println!("processed image at {reference}");
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving the workflow directly
//!
//! The state machine is the single source of truth; drive it when the
//! surrounding application needs to render intermediate stages:
//!
//! ```rust,no_run
//! use bgstrip::{
//!     encoder, remote, validator, ClientConfig, HttpRemovalService, Workflow, WorkflowState,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let mut workflow = Workflow::new();
//!
//! let candidate = encoder::read_candidate("input.png").await?;
//! match validator::validate(vec![candidate], &[], &config.validation) {
//!     Ok(file) => {
//!         let id = workflow.select(file);
//!         let payload = encoder::encode(workflow.selected_file().unwrap()).await;
//!         workflow.attach_payload(id, payload);
//!     },
//!     Err(err) => workflow.reject(err.user_message()),
//! }
//!
//! if workflow.can_submit() {
//!     let service = HttpRemovalService::new(&config)?;
//!     let _ = remote::submit(&mut workflow, &service).await;
//! }
//! assert!(matches!(
//!     workflow.state(),
//!     WorkflowState::Done | WorkflowState::Failed | WorkflowState::Idle
//! ));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod exporter;
pub mod remote;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod validator;
pub mod workflow;

#[cfg(feature = "cli")]
pub mod cli;

// Public API exports
pub use config::{
    ClientConfig, ClientConfigBuilder, MediaType, ValidationConfig, DEFAULT_ENDPOINT,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_OUTPUT_FILENAME,
};
pub use error::{BgStripError, Result};
pub use exporter::Exporter;
pub use remote::{HttpRemovalService, RemovalService};
pub use types::{
    format_size, EncodedPayload, FileCandidate, FileId, FileRejection, RejectionReason,
    SelectedFile,
};
pub use validator::validate;
pub use workflow::{Workflow, WorkflowState};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig};

/// Remove the background from an image file in one call.
///
/// Drives the complete workflow (intake validation, encoding, submission)
/// and returns the result reference from the remote service. Suitable when
/// no intermediate state needs to be rendered; applications that do should
/// drive a [`Workflow`] directly.
///
/// # Arguments
///
/// * `path` - Path to a PNG or JPEG file within the configured size ceiling
/// * `config` - Workflow configuration (endpoint, timeout, validation)
///
/// # Returns
///
/// The result reference (URL or data URI) of the processed image.
///
/// # Errors
/// - File cannot be read or fails validation
/// - The service declares a failure or the transport fails
pub async fn remove_background_from_path<P: AsRef<std::path::Path>>(
    path: P,
    config: &ClientConfig,
) -> Result<String> {
    let mut workflow = Workflow::new();

    let candidate = encoder::read_candidate(path).await?;
    let file = validate(vec![candidate], &[], &config.validation)?;
    let id = workflow.select(file);

    let selected = workflow
        .selected_file()
        .ok_or_else(|| BgStripError::invalid_state("no file selected"))?;
    let payload = encoder::encode(selected).await;
    workflow.attach_payload(id, payload);

    let service = HttpRemovalService::new(config)?;
    remote::submit(&mut workflow, &service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejected_file_never_reaches_the_service() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("too_big.png");
        tokio::fs::write(&path, vec![0u8; 2 * 1024 * 1024])
            .await
            .unwrap();

        let config = ClientConfig::default();
        let err = remove_background_from_path(&path, &config).await.unwrap_err();
        assert!(matches!(err, BgStripError::Validation(_)));
    }
}
