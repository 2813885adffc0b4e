//! Duration-based splitting via ffmpeg.
//!
//! [`MediaSegmenter`] is the seam the pipeline depends on;
//! [`FfmpegSegmenter`] is the production adapter. Splitting is purely
//! mechanical: fixed-duration windows measured from the start of the file,
//! stream-copied without re-encoding, with each segment's timestamps reset
//! to zero so it is independently decodable.
//!
//! Output files are named with a zero-padded index (`segment_000.mp3`,
//! `segment_001.mp3`, …) so lexicographic filename order equals sequence
//! order — the aggregator trusts this and does not re-verify timestamps.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::media::format;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One time-bounded, independently decodable sub-file of the source audio.
///
/// Segments are contiguous, non-overlapping, and span the full duration of
/// the source; each is at most the configured window long except possibly
/// the last. The 0-based `index` defines reassembly order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// SplitError
// ---------------------------------------------------------------------------

/// Errors from the splitting subsystem. All fatal; the scratch directory is
/// still removed by its owner when any of these propagate.
#[derive(Debug, Error)]
pub enum SplitError {
    /// `ffmpeg` could not be launched.
    #[error("failed to launch ffmpeg: {0}")]
    Launch(#[source] std::io::Error),

    /// `ffmpeg` ran but exited with a non-zero status.
    #[error("ffmpeg split failed: {stderr}")]
    Failed { stderr: String },

    /// The destination directory could not be enumerated afterwards.
    #[error("failed to list segment files: {0}")]
    ListOutput(#[source] std::io::Error),

    /// `ffmpeg` reported success but wrote no segment files.
    #[error("ffmpeg produced no segment files in {dest}")]
    NoOutput { dest: String },
}

// ---------------------------------------------------------------------------
// MediaSegmenter trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for duration-based splitting.
///
/// # Contract
///
/// Writes an ordered sequence of segment files into `dest`, each no longer
/// than `window_secs`, and returns them in ascending sequence order. The
/// source file is never modified.
pub trait MediaSegmenter: Send + Sync {
    fn split(&self, source: &Path, window_secs: u32, dest: &Path)
        -> Result<Vec<Segment>, SplitError>;
}

// ---------------------------------------------------------------------------
// expected_segments
// ---------------------------------------------------------------------------

/// Number of windows a recording of `duration` seconds splits into:
/// `floor(duration / window) + 1`. The final window may be shorter.
///
/// Used for progress logging; the files the segmenter actually produced are
/// the source of truth for the chunk descriptor.
pub fn expected_segments(duration: f64, window_secs: u32) -> usize {
    (duration / f64::from(window_secs)) as usize + 1
}

// ---------------------------------------------------------------------------
// FfmpegSegmenter
// ---------------------------------------------------------------------------

/// Production segmenter that runs `ffmpeg -f segment` with stream copy.
#[derive(Debug, Default)]
pub struct FfmpegSegmenter;

impl FfmpegSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl MediaSegmenter for FfmpegSegmenter {
    fn split(
        &self,
        source: &Path,
        window_secs: u32,
        dest: &Path,
    ) -> Result<Vec<Segment>, SplitError> {
        // Segments keep the source container so the service accepts them
        // without re-encoding.
        let ext = format::extension_of(source).unwrap_or_else(|| "mp3".into());
        let pattern = dest.join(format!("segment_%03d.{ext}"));

        let output = Command::new("ffmpeg")
            .arg("-i")
            .arg(source)
            .args(["-f", "segment", "-segment_time"])
            .arg(window_secs.to_string())
            .args(["-c", "copy", "-reset_timestamps", "1"])
            .arg(&pattern)
            .output()
            .map_err(SplitError::Launch)?;

        if !output.status.success() {
            return Err(SplitError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        collect_segments(dest, &ext)
    }
}

/// Gather `segment_*.<ext>` files from `dest`, sorted lexicographically
/// (zero-padded names make this sequence order), and index them.
fn collect_segments(dest: &Path, ext: &str) -> Result<Vec<Segment>, SplitError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dest)
        .map_err(SplitError::ListOutput)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("segment_") && n.ends_with(&format!(".{ext}")))
        })
        .collect();

    if paths.is_empty() {
        return Err(SplitError::NoOutput {
            dest: dest.display().to_string(),
        });
    }

    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| Segment { index, path })
        .collect())
}

// ---------------------------------------------------------------------------
// MockSegmenter  (test-only)
// ---------------------------------------------------------------------------

/// A test double that fabricates segment files without running ffmpeg.
///
/// Records the destination directory it was asked to write into so tests
/// can assert the scratch directory was removed afterwards.
#[cfg(test)]
pub struct MockSegmenter {
    count: usize,
    fail: bool,
    pub last_dest: std::sync::Mutex<Option<PathBuf>>,
}

#[cfg(test)]
impl MockSegmenter {
    /// Create a mock that writes `count` empty segment files and succeeds.
    pub fn ok(count: usize) -> Self {
        Self {
            count,
            fail: false,
            last_dest: std::sync::Mutex::new(None),
        }
    }

    /// Create a mock that records the destination, then fails.
    pub fn err() -> Self {
        Self {
            count: 0,
            fail: true,
            last_dest: std::sync::Mutex::new(None),
        }
    }
}

#[cfg(test)]
impl MediaSegmenter for MockSegmenter {
    fn split(
        &self,
        source: &Path,
        _window_secs: u32,
        dest: &Path,
    ) -> Result<Vec<Segment>, SplitError> {
        *self.last_dest.lock().unwrap() = Some(dest.to_path_buf());

        if self.fail {
            return Err(SplitError::Failed {
                stderr: "mock split failure".into(),
            });
        }

        let ext = format::extension_of(source).unwrap_or_else(|| "mp3".into());
        let mut segments = Vec::with_capacity(self.count);
        for index in 0..self.count {
            let path = dest.join(format!("segment_{index:03}.{ext}"));
            std::fs::write(&path, b"").map_err(SplitError::ListOutput)?;
            segments.push(Segment { index, path });
        }
        Ok(segments)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // --- expected_segments ---

    #[test]
    fn expected_segments_for_long_recording() {
        // 2700 s at a 1300 s window → 1300 + 1300 + 100.
        assert_eq!(expected_segments(2700.0, 1300), 3);
    }

    #[test]
    fn expected_segments_for_exact_multiple() {
        // Splitting happens only above the ceiling, and 2600 / 1300 still
        // yields a (zero-length-tail) plan of 3; ffmpeg output decides.
        assert_eq!(expected_segments(2600.0, 1300), 3);
    }

    #[test]
    fn expected_segments_for_short_recording() {
        assert_eq!(expected_segments(60.0, 1300), 1);
    }

    // --- collect_segments ---

    #[test]
    fn collects_and_orders_segment_files() {
        let dir = tempdir().expect("temp dir");
        // Create out of order to prove sorting.
        for name in ["segment_002.mp3", "segment_000.mp3", "segment_001.mp3"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        // A stray file that must be ignored.
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let segments = collect_segments(dir.path(), "mp3").unwrap();

        assert_eq!(segments.len(), 3);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, i);
            assert_eq!(
                segment.path.file_name().unwrap().to_str().unwrap(),
                format!("segment_{i:03}.mp3")
            );
        }
    }

    #[test]
    fn empty_destination_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let err = collect_segments(dir.path(), "mp3").unwrap_err();
        assert!(matches!(err, SplitError::NoOutput { .. }));
    }

    #[test]
    fn files_with_other_extension_are_ignored() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("segment_000.wav"), b"").unwrap();

        let err = collect_segments(dir.path(), "mp3").unwrap_err();
        assert!(matches!(err, SplitError::NoOutput { .. }));
    }

    // --- MockSegmenter ---

    #[test]
    fn mock_writes_ordered_files_and_records_dest() {
        let dir = tempdir().expect("temp dir");
        let segmenter = MockSegmenter::ok(2);

        let segments = segmenter
            .split(Path::new("meeting.mp3"), 1300, dir.path())
            .unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.path.exists()));
        assert_eq!(
            segmenter.last_dest.lock().unwrap().as_deref(),
            Some(dir.path())
        );
    }

    #[test]
    fn mock_err_records_dest_then_fails() {
        let dir = tempdir().expect("temp dir");
        let segmenter = MockSegmenter::err();

        let result = segmenter.split(Path::new("meeting.mp3"), 1300, dir.path());

        assert!(result.is_err());
        assert!(segmenter.last_dest.lock().unwrap().is_some());
    }
}
