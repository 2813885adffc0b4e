//! Transcript fragments, aggregation, and the final result record.
//!
//! Aggregation is a pure function of `(index, text)` pairs: fragments are
//! sorted by sequence index and joined with one blank line, so the final
//! order never depends on the order in which service responses arrived.

use std::path::Path;

use anyhow::Result;
use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// Recognized text for exactly one segment (or for the whole file when the
/// recording was short enough to skip segmentation — then `index` is 0).
///
/// Immutable once produced; `text` may be empty when the service recognized
/// no speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub index: usize,
    pub text: String,
}

// ---------------------------------------------------------------------------
// ChunkInfo
// ---------------------------------------------------------------------------

/// Segmentation descriptor, present in the result only when the recording
/// was actually split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    /// Number of segments produced.
    pub count: usize,
    /// Window size that was used, in seconds.
    pub chunk_duration_seconds: u32,
}

// ---------------------------------------------------------------------------
// TranscriptResult
// ---------------------------------------------------------------------------

/// The final output record, serialized as a UTF-8 JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Fragments joined in index order, one blank line between them.
    pub transcript: String,
    /// The input path, echoed as given.
    pub source_file: String,
    /// Total playback duration of the source, in seconds.
    pub duration_seconds: f64,
    /// ISO-8601 timestamp in the configured reporting offset.
    pub processed_at: String,
    /// Present only when segmentation occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<ChunkInfo>,
}

impl TranscriptResult {
    /// Assemble the result from fragments and run metadata.
    pub fn assemble(
        fragments: Vec<Fragment>,
        source: &Path,
        duration_seconds: f64,
        chunks: Option<ChunkInfo>,
        utc_offset_hours: i32,
    ) -> Self {
        Self {
            transcript: join_fragments(fragments),
            source_file: source.display().to_string(),
            duration_seconds,
            processed_at: report_timestamp(utc_offset_hours),
            chunks,
        }
    }

    /// Write the record as pretty JSON to `path`, creating parent
    /// directories as needed. Non-ASCII text is written verbatim.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// join_fragments
// ---------------------------------------------------------------------------

/// Join fragments in ascending index order with exactly one blank line
/// (`"\n\n"`) between adjacent fragments. A single fragment gets no
/// separator. Fragment text is used untouched.
pub fn join_fragments(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by_key(|f| f.index);
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ---------------------------------------------------------------------------
// report_timestamp
// ---------------------------------------------------------------------------

/// Current time as an ISO-8601 string in a fixed UTC offset.
///
/// An out-of-range offset falls back to UTC rather than failing the run at
/// the very last step.
pub fn report_timestamp(utc_offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is always valid"));
    Utc::now().with_timezone(&offset).to_rfc3339()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
