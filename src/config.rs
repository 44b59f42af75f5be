//! Configuration types for the client workflow

use crate::error::{BgStripError, Result};
use crate::types::format_size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ceiling on accepted file size (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Default filename used when exporting a result
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.png";

/// Default removal service endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/replicate";

/// Default timeout for one removal request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Media types accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
}

impl MediaType {
    /// The canonical MIME string for this media type
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parse a declared MIME string into a known media type
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime())
    }
}

/// Constraints applied to a dropped or selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum accepted file size in bytes
    pub max_file_size: u64,
    /// Media types accepted for upload
    pub allowed_types: Vec<MediaType>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: vec![MediaType::Jpeg, MediaType::Png],
        }
    }
}

impl ValidationConfig {
    /// The user-facing message shown for any rejected intake.
    ///
    /// Derived from the configured ceiling so the displayed limit always
    /// matches the enforced one.
    #[must_use]
    pub fn rejection_message(&self) -> String {
        format!(
            "Please upload a PNG or JPEG image less than {}.",
            format_size(self.max_file_size)
        )
    }
}

/// Complete configuration for the client workflow
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Removal service endpoint URL
    pub endpoint: String,
    /// Timeout applied to one removal request
    pub timeout: Duration,
    /// Filename used when exporting a result
    pub output_filename: String,
    /// File intake constraints
    pub validation: ValidationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration builder
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    output_filename: Option<String>,
    validation: Option<ValidationConfig>,
}

impl ClientConfigBuilder {
    /// Create a new builder with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the removal service endpoint URL
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the export filename
    #[must_use]
    pub fn output_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.output_filename = Some(filename.into());
        self
    }

    /// Set the maximum accepted file size in bytes
    #[must_use]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.validation
            .get_or_insert_with(ValidationConfig::default)
            .max_file_size = bytes;
        self
    }

    /// Replace the full validation configuration
    #[must_use]
    pub fn validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// - Endpoint is empty or not a valid URL
    /// - File size ceiling is zero
    /// - No allowed media types configured
    /// - Output filename is empty
    pub fn build(self) -> Result<ClientConfig> {
        let config = ClientConfig {
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            output_filename: self
                .output_filename
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILENAME.to_string()),
            validation: self.validation.unwrap_or_default(),
        };

        if config.endpoint.is_empty() {
            return Err(BgStripError::invalid_config("endpoint must not be empty"));
        }
        reqwest::Url::parse(&config.endpoint).map_err(|e| {
            BgStripError::invalid_config(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        if config.validation.max_file_size == 0 {
            return Err(BgStripError::invalid_config(
                "max file size must be greater than zero",
            ));
        }
        if config.validation.allowed_types.is_empty() {
            return Err(BgStripError::invalid_config(
                "at least one allowed media type is required",
            ));
        }
        if config.output_filename.is_empty() {
            return Err(BgStripError::invalid_config(
                "output filename must not be empty",
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClientConfig::builder().build().unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_filename, DEFAULT_OUTPUT_FILENAME);
        assert_eq!(config.validation.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn rejection_message_tracks_configured_ceiling() {
        let validation = ValidationConfig::default();
        assert_eq!(
            validation.rejection_message(),
            "Please upload a PNG or JPEG image less than 1.0 MB."
        );

        let larger = ValidationConfig {
            max_file_size: 5 * 1024 * 1024,
            ..ValidationConfig::default()
        };
        assert_eq!(
            larger.rejection_message(),
            "Please upload a PNG or JPEG image less than 5.0 MB."
        );
    }

    #[test]
    fn builder_rejects_bad_endpoint() {
        let result = ClientConfig::builder().endpoint("not a url").build();
        assert!(matches!(result, Err(BgStripError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_zero_ceiling() {
        let result = ClientConfig::builder().max_file_size(0).build();
        assert!(matches!(result, Err(BgStripError::InvalidConfig(_))));
    }

    #[test]
    fn media_type_parsing() {
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("IMAGE/JPG"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("image/webp"), None);
    }
}
