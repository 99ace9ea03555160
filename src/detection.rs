//! MIME type and file extension detection.
//!
//! Detection strategy (in priority order):
//! 1. `infer` crate - magic byte detection on the file's leading bytes
//! 2. `mime_guess` crate - extension-based fallback

use std::io;
use std::path::Path;

/// Result of a detection attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    /// The detected MIME type (e.g., "image/png").
    pub mime_type: Option<String>,
    /// The detected file extension without dot (e.g., "png").
    pub extension: Option<String>,
}

/// Detect MIME type and extension of the file at `path`.
///
/// Reads the leading bytes through a handle of its own. Falls back to the
/// filename when the content carries no known signature.
pub fn detect_from_path(path: &Path) -> io::Result<DetectionResult> {
    if let Some(kind) = infer::get_from_path(path)? {
        return Ok(DetectionResult {
            mime_type: Some(kind.mime_type().to_string()),
            extension: Some(kind.extension().to_string()),
        });
    }

    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Ok(detect_from_filename(name)),
        None => Ok(DetectionResult::default()),
    }
}

/// Detect MIME type and extension from a filename using the `mime_guess` crate.
pub fn detect_from_filename(filename: &str) -> DetectionResult {
    let guess = mime_guess::from_path(filename);
    let mime_type = guess.first().map(|m| m.to_string());
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_string());

    DetectionResult {
        mime_type,
        extension,
    }
}
