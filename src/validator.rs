//! File intake validation
//!
//! Enforces the single-file policy, the accepted media types, and the size
//! ceiling before a candidate becomes the workflow's selected file. No
//! network activity happens here; a rejection only produces the user-facing
//! message and leaves any previously selected file untouched.

use crate::config::{MediaType, ValidationConfig};
use crate::error::{BgStripError, Result};
use crate::types::{FileCandidate, FileRejection, SelectedFile};
use tracing::debug;

/// Validate one drop/selection gesture.
///
/// Accepts exactly when no pre-classified rejections are present, exactly
/// one candidate was offered, its declared media type is in the allowed set,
/// and its size is at or under the configured ceiling. Every rejection path
/// surfaces the same static message generated from the configuration.
///
/// # Errors
/// - [`BgStripError::Validation`] with the user-facing rejection message
pub fn validate(
    candidates: Vec<FileCandidate>,
    rejections: &[FileRejection],
    config: &ValidationConfig,
) -> Result<SelectedFile> {
    if !rejections.is_empty() {
        for rejection in rejections {
            debug!(
                name = %rejection.name,
                reason = %rejection.reason,
                "candidate pre-rejected by drop source"
            );
        }
        return Err(BgStripError::validation(config.rejection_message()));
    }

    if candidates.len() != 1 {
        debug!(count = candidates.len(), "single-file policy violated");
        return Err(BgStripError::validation(config.rejection_message()));
    }
    let Some(candidate) = candidates.into_iter().next() else {
        return Err(BgStripError::validation(config.rejection_message()));
    };

    let media_type = match MediaType::from_mime(&candidate.declared_type) {
        Some(t) if config.allowed_types.contains(&t) => t,
        _ => {
            debug!(
                name = %candidate.name,
                declared = %candidate.declared_type,
                "declared media type not accepted"
            );
            return Err(BgStripError::validation(config.rejection_message()));
        },
    };

    if candidate.size() > config.max_file_size {
        debug!(
            name = %candidate.name,
            size = candidate.size(),
            ceiling = config.max_file_size,
            "file exceeds size ceiling"
        );
        return Err(BgStripError::validation(config.rejection_message()));
    }

    debug!(name = %candidate.name, size = candidate.size(), %media_type, "file accepted");
    Ok(SelectedFile {
        name: candidate.name,
        media_type,
        bytes: candidate.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RejectionReason;

    fn candidate(name: &str, mime: &str, len: usize) -> FileCandidate {
        FileCandidate {
            name: name.to_string(),
            declared_type: mime.to_string(),
            bytes: vec![0xAB; len],
        }
    }

    fn config() -> ValidationConfig {
        ValidationConfig::default()
    }

    #[test]
    fn accepts_single_png_under_ceiling() {
        let file = validate(vec![candidate("a.png", "image/png", 500 * 1024)], &[], &config())
            .unwrap();
        assert_eq!(file.name, "a.png");
        assert_eq!(file.media_type, MediaType::Png);
        assert_eq!(file.size(), 500 * 1024);
    }

    #[test]
    fn accepts_single_jpeg() {
        let file =
            validate(vec![candidate("b.jpeg", "image/jpeg", 1024)], &[], &config()).unwrap();
        assert_eq!(file.media_type, MediaType::Jpeg);
    }

    #[test]
    fn rejects_when_drop_source_pre_rejected() {
        let rejections = vec![FileRejection {
            name: "big.png".to_string(),
            reason: RejectionReason::Oversize,
        }];
        let err = validate(
            vec![candidate("a.png", "image/png", 10)],
            &rejections,
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, BgStripError::Validation(_)));
        assert_eq!(err.to_string(), config().rejection_message());
    }

    #[test]
    fn rejects_multiple_candidates() {
        let err = validate(
            vec![
                candidate("a.png", "image/png", 10),
                candidate("b.png", "image/png", 10),
            ],
            &[],
            &config(),
        )
        .unwrap_err();
        assert!(matches!(err, BgStripError::Validation(_)));
    }

    #[test]
    fn rejects_empty_gesture() {
        let err = validate(vec![], &[], &config()).unwrap_err();
        assert!(matches!(err, BgStripError::Validation(_)));
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let err = validate(vec![candidate("a.webp", "image/webp", 10)], &[], &config())
            .unwrap_err();
        assert!(matches!(err, BgStripError::Validation(_)));
    }

    #[test]
    fn rejects_oversize_file() {
        // 2 MiB against the default 1 MiB ceiling
        let err = validate(
            vec![candidate("big.png", "image/png", 2 * 1024 * 1024)],
            &[],
            &config(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please upload a PNG or JPEG image less than 1.0 MB."
        );
    }

    #[test]
    fn exact_ceiling_is_accepted() {
        let file = validate(
            vec![candidate("edge.png", "image/png", 1024 * 1024)],
            &[],
            &config(),
        )
        .unwrap();
        assert_eq!(file.size(), 1024 * 1024);
    }
}
