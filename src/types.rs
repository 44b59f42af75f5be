//! Core data types shared across the client workflow

use crate::config::MediaType;
use serde::{Deserialize, Serialize};

/// Identity tag minted per accepted file.
///
/// Asynchronous completions (encoding, remote responses) carry the tag of
/// the file they were started for; completions whose tag no longer matches
/// the workflow's current file are discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(u64);

impl FileId {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file-{}", self.0)
    }
}

/// A file offered by a drop or selection gesture, before validation
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Display name of the file
    pub name: String,
    /// MIME type as declared by the drop source
    pub declared_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    /// Size of the candidate in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Reason codes attached to pre-classified rejections from the drop source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Declared media type outside the accepted set
    WrongType,
    /// File larger than the configured ceiling
    Oversize,
    /// More files offered than the single-file policy allows
    TooManyFiles,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongType => write!(f, "wrong type"),
            Self::Oversize => write!(f, "oversize"),
            Self::TooManyFiles => write!(f, "too many files"),
        }
    }
}

/// A pre-classified rejection accompanying a drop gesture
#[derive(Debug, Clone)]
pub struct FileRejection {
    /// Display name of the rejected file
    pub name: String,
    /// Why the drop source rejected it
    pub reason: RejectionReason,
}

/// The single image currently accepted for processing.
///
/// At most one instance is live at a time; the workflow owns it from
/// acceptance until deletion or replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name of the file
    pub name: String,
    /// Validated media type
    pub media_type: MediaType,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Size of the file in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Human-readable "name (size)" label for display
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, format_size(self.size()))
    }
}

/// Transport-safe textual form of a [`SelectedFile`]'s bytes.
///
/// A `data:<mime>;base64,<payload>` string, derived 1:1 from the file it
/// was encoded from. Present only while that file is the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub(crate) fn new(data_uri: String) -> Self {
        Self(data_uri)
    }

    /// The full data-URI string carried in the request body
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads run to megabytes; show only the prefix
        let prefix: String = self.0.chars().take(48).collect();
        write!(f, "{prefix}…")
    }
}

/// Format a byte count as a human-readable size string
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS.get(unit_index).unwrap_or(&"B"))
    } else {
        format!("{:.1} {}", size, UNITS.get(unit_index).unwrap_or(&"B"))
    }
}
