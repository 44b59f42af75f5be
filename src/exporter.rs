//! Result export
//!
//! Given the result reference from a completed removal, materializes the
//! output bytes (fetching URLs, decoding inline data URIs) and writes them
//! to a local file.

use crate::encoder;
use crate::error::{BgStripError, Result};
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info};

/// Saves result references to local files
#[derive(Debug)]
pub struct Exporter {
    client: Client,
}

impl Exporter {
    /// Create a new exporter
    ///
    /// # Errors
    /// - HTTP client construction fails
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| BgStripError::network_error("Failed to create HTTP client", &e))?;
        Ok(Self { client })
    }

    /// Save the referenced output image to `path`.
    ///
    /// `data:` references are decoded locally; anything else is treated as
    /// a URL and fetched.
    ///
    /// # Errors
    /// - Reference cannot be fetched or decoded
    /// - The file cannot be written
    pub async fn save<P: AsRef<Path>>(&self, reference: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = if reference.starts_with("data:") {
            debug!("decoding inline result reference");
            encoder::decode_data_uri(reference)?
        } else {
            self.fetch(reference).await?
        };

        tokio::fs::write(path, &bytes).await.map_err(|e| {
            BgStripError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write '{}': {}", path.display(), e),
            ))
        })?;
        info!(path = %path.display(), size = bytes.len(), "result saved");
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "fetching result reference");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BgStripError::network_error("Failed to fetch result", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BgStripError::transport(format!(
                "result fetch returned status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BgStripError::network_error("Failed to read result bytes", &e))?;
        Ok(bytes.to_vec())
    }
}
