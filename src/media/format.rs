//! Supported audio formats and their MIME types.
//!
//! The set is fixed by what the hosted transcription service accepts; any
//! other extension is rejected before the pipeline touches the file.

use std::path::Path;

/// Extensions (lowercase, without the dot) the service accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["mp3", "mp4", "wav", "m4a", "webm", "ogg", "flac"];

/// Lowercased extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether `path` carries one of the supported extensions (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type used for the upload part, keyed by extension.
///
/// Unknown extensions fall back to `application/octet-stream`; the service
/// sniffs content anyway, the type is a hint.
pub fn mime_for(extension: &str) -> &'static str {
    match extension {
        "mp3" => "audio/mpeg",
        "mp4" | "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
