//! Duration probing via ffprobe.
//!
//! [`DurationProber`] is the seam the pipeline depends on; [`FfprobeProber`]
//! is the production adapter that shells out to `ffprobe` and parses its
//! one-line output. Output-format parsing lives here, not in the pipeline,
//! so the concrete tool can be swapped or mocked.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ProbeError
// ---------------------------------------------------------------------------

/// Errors from the duration-probing subsystem.
///
/// All variants are fatal: without a duration the pipeline cannot decide
/// whether to segment, so the run aborts.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// `ffprobe` could not be launched (typically not installed / not on PATH).
    #[error("failed to launch ffprobe: {0}")]
    Launch(#[source] std::io::Error),

    /// `ffprobe` ran but exited with a non-zero status.
    #[error("ffprobe failed: {stderr}")]
    Failed { stderr: String },

    /// `ffprobe` succeeded but its output was not a single float.
    #[error("could not parse duration from ffprobe output: {output:?}")]
    Parse { output: String },
}

// ---------------------------------------------------------------------------
// DurationProber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for duration inspection.
///
/// # Contract
///
/// Returns the playback duration of `source` in seconds. Read-only; the
/// source file is never modified.
pub trait DurationProber: Send + Sync {
    fn probe(&self, source: &Path) -> Result<f64, ProbeError>;
}

// ---------------------------------------------------------------------------
// FfprobeProber
// ---------------------------------------------------------------------------

/// Production prober that runs `ffprobe` and parses its stdout.
#[derive(Debug, Default)]
pub struct FfprobeProber;

impl FfprobeProber {
    pub fn new() -> Self {
        Self
    }
}

impl DurationProber for FfprobeProber {
    fn probe(&self, source: &Path) -> Result<f64, ProbeError> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(source)
            .output()
            .map_err(ProbeError::Launch)?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse ffprobe's `format=duration` output: a single float on one line.
fn parse_duration(stdout: &str) -> Result<f64, ProbeError> {
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| ProbeError::Parse {
            output: stdout.trim().to_string(),
        })
}

// ---------------------------------------------------------------------------
// MockProber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured duration without touching
/// the filesystem or launching any process.
#[cfg(test)]
pub struct MockProber {
    duration: Option<f64>,
}

#[cfg(test)]
impl MockProber {
    /// Create a mock that always returns `Ok(duration)`.
    pub fn ok(duration: f64) -> Self {
        Self {
            duration: Some(duration),
        }
    }

    /// Create a mock that always fails.
    pub fn err() -> Self {
        Self { duration: None }
    }
}

#[cfg(test)]
impl DurationProber for MockProber {
    fn probe(&self, _source: &Path) -> Result<f64, ProbeError> {
        self.duration.ok_or(ProbeError::Failed {
            stderr: "mock probe failure".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- parse_duration ---

    #[test]
    fn parses_plain_float_with_trailing_newline() {
        assert_eq!(parse_duration("123.456\n").unwrap(), 123.456);
    }

    #[test]
    fn parses_integer_duration() {
        assert_eq!(parse_duration("60").unwrap(), 60.0);
    }

    #[test]
    fn rejects_empty_output() {
        assert!(matches!(
            parse_duration(""),
            Err(ProbeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_garbage_output() {
        let err = parse_duration("N/A\n").unwrap_err();
        assert!(matches!(err, ProbeError::Parse { .. }));
        assert!(err.to_string().contains("N/A"));
    }

    // --- MockProber ---

    #[test]
    fn mock_ok_returns_configured_duration() {
        let prober = MockProber::ok(2700.0);
        assert_eq!(prober.probe(Path::new("x.mp3")).unwrap(), 2700.0);
    }

    #[test]
    fn mock_err_fails() {
        let prober = MockProber::err();
        assert!(prober.probe(Path::new("x.mp3")).is_err());
    }

    // --- object safety ---

    #[test]
    fn box_dyn_prober_compiles() {
        let prober: Box<dyn DurationProber> = Box::new(MockProber::ok(1.0));
        let _ = prober.probe(Path::new("x.wav"));
    }
}
