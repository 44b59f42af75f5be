//! Binary-to-text encoding for transport
//!
//! Converts an accepted file's bytes into the `data:<mime>;base64,<...>`
//! form the remote service expects in its request body, and reads candidate
//! files from disk without blocking the driving control flow.

use crate::error::{BgStripError, Result};
use crate::types::{EncodedPayload, FileCandidate, SelectedFile};
use base64::Engine as _;
use std::path::Path;
use tracing::debug;

/// Read a file from disk into an intake candidate.
///
/// The declared media type is sniffed from the file contents (falling back
/// to the extension when the content is not a recognized image format), so
/// a renamed file cannot smuggle an unsupported format past validation.
///
/// # Errors
/// - File cannot be read
pub async fn read_candidate<P: AsRef<Path>>(path: P) -> Result<FileCandidate> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        BgStripError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read '{}': {}", path.display(), e),
        ))
    })?;

    let declared_type = sniff_media_type(&bytes)
        .or_else(|| type_from_extension(path))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    debug!(name = %name, declared = %declared_type, size = bytes.len(), "read candidate file");
    Ok(FileCandidate {
        name,
        declared_type,
        bytes,
    })
}

/// Encode the selected file's bytes into the transport payload.
///
/// Reading and encoding a file is a suspension point in the workflow; the
/// submit path is gated on this having completed.
pub async fn encode(file: &SelectedFile) -> EncodedPayload {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
    let payload = EncodedPayload::new(format!("data:{};base64,{}", file.media_type, encoded));
    debug!(name = %file.name, encoded_len = payload.as_str().len(), "payload encoded");
    payload
}

/// Decode a `data:` URI into its raw bytes.
///
/// Used when a result reference is delivered inline rather than as a URL.
///
/// # Errors
/// - Reference is not a base64 data URI or its payload does not decode
pub fn decode_data_uri(reference: &str) -> Result<Vec<u8>> {
    let (_, remainder) = reference
        .split_once("data:")
        .ok_or_else(|| BgStripError::transport(format!("not a data URI: {reference}")))?;
    let (_, payload) = remainder
        .split_once(";base64,")
        .ok_or_else(|| BgStripError::transport("data URI is not base64-encoded"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| BgStripError::transport(format!("invalid base64 payload: {e}")))
}

fn sniff_media_type(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

fn type_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png".to_string()),
        "jpg" | "jpeg" => Some("image/jpeg".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaType;

    fn selected(bytes: Vec<u8>, media_type: MediaType) -> SelectedFile {
        SelectedFile {
            name: "test.png".to_string(),
            media_type,
            bytes,
        }
    }

    #[tokio::test]
    async fn encodes_bytes_as_data_uri() {
        let file = selected(b"hello".to_vec(), MediaType::Png);
        let payload = encode(&file).await;
        assert_eq!(payload.as_str(), "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn jpeg_payload_carries_jpeg_prefix() {
        let file = selected(vec![0xFF, 0xD8, 0xFF], MediaType::Jpeg);
        let payload = encode(&file).await;
        assert!(payload.as_str().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn payload_round_trips_through_data_uri_decode() {
        let original = vec![0u8, 1, 2, 3, 254, 255];
        let file = selected(original.clone(), MediaType::Png);
        let payload = encode(&file).await;
        assert_eq!(decode_data_uri(payload.as_str()).unwrap(), original);
    }

    #[test]
    fn decode_rejects_non_data_uri() {
        let err = decode_data_uri("https://example.com/out.png").unwrap_err();
        assert!(matches!(err, BgStripError::Transport(_)));
    }

    #[test]
    fn decode_rejects_unencoded_data_uri() {
        let err = decode_data_uri("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, BgStripError::Transport(_)));
    }

    #[tokio::test]
    async fn read_candidate_sniffs_png_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.bin");
        // Minimal PNG signature followed by junk; enough for format sniffing
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        tokio::fs::write(&path, &bytes).await.unwrap();

        let candidate = read_candidate(&path).await.unwrap();
        assert_eq!(candidate.declared_type, "image/png");
        assert_eq!(candidate.name, "image.bin");
        assert_eq!(candidate.bytes, bytes);
    }

    #[tokio::test]
    async fn read_candidate_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.jpg");
        tokio::fs::write(&path, b"not an image").await.unwrap();

        let candidate = read_candidate(&path).await.unwrap();
        assert_eq!(candidate.declared_type, "image/jpeg");
    }

    #[tokio::test]
    async fn read_candidate_missing_file_is_io_error() {
        let err = read_candidate("/nonexistent/nope.png").await.unwrap_err();
        assert!(matches!(err, BgStripError::Io(_)));
    }
}
