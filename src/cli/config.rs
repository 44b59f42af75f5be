//! Conversion from CLI arguments to workflow configuration

use super::main_impl::Cli;
use crate::config::ClientConfig;
use crate::error::Result;
use std::time::Duration;

/// Builds a [`ClientConfig`] from parsed CLI arguments
pub struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Convert CLI arguments to a validated workflow configuration
    ///
    /// # Errors
    /// - Arguments fail configuration validation (bad endpoint, zero
    ///   ceiling, empty output filename)
    pub fn from_cli(cli: &Cli) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder()
            .endpoint(cli.endpoint.clone())
            .timeout(Duration::from_secs(cli.timeout));

        if let Some(max_file_size) = cli.max_file_size {
            builder = builder.max_file_size(max_file_size);
        }
        if let Some(output) = &cli.output {
            builder = builder.output_filename(output.to_string_lossy());
        }

        builder.build()
    }
}
