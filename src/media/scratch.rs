//! Scoped scratch directory for segment files.
//!
//! One pipeline run exclusively owns one [`ScratchDir`]; segment files are
//! written inside it and nothing else may share it. Dropping the value
//! removes the directory and everything in it — on normal completion, on
//! early error returns, and during panic unwind alike.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// A freshly created temporary directory tied to one pipeline run.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a new scratch directory under the system temp location.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("transcribe-").tempdir()?;
        log::debug!("scratch directory created: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
