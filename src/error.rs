//! Error types for the background removal client workflow

use thiserror::Error;

/// Result type alias for client workflow operations
pub type Result<T> = std::result::Result<T, BgStripError>;

/// Error types covering the full client workflow taxonomy
#[derive(Error, Debug)]
pub enum BgStripError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File intake rejected (wrong type, oversize, multiple files)
    #[error("{0}")]
    Validation(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error declared by the remote service in an otherwise well-formed response
    #[error("Service error: {0}")]
    Service(String),

    /// Network failure or a response the client could not parse
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation attempted in a workflow state that does not permit it
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl BgStripError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new service-declared error
    pub fn service<S: Into<String>>(msg: S) -> Self {
        Self::Service(msg.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new invalid state error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a transport error with operation context from a network failure
    pub fn network_error(operation: &str, error: &reqwest::Error) -> Self {
        Self::Transport(format!("{operation}: {error}"))
    }

    /// The message shown to the user for this error.
    ///
    /// Service-declared errors are surfaced verbatim; transport-level
    /// failures collapse into one generic message so raw protocol detail
    /// never reaches the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Something went wrong while contacting the removal service. Please try again."
                    .to_string()
            },
            Self::Service(msg) | Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
