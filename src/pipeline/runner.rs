//! Pipeline orchestrator — drives probe → (split) → transcribe → aggregate.
//!
//! [`TranscriptionPipeline`] owns the three adapter seams behind `Arc<dyn …>`
//! (constructor injection — tests substitute mocks without touching any
//! process-wide state) and makes the short-vs-long decision exactly once,
//! from the probed duration.
//!
//! # Pipeline flow
//!
//! ```text
//! run(source)
//!   └─▶ probe duration                      [spawn_blocking]
//!         ├─ duration ≤ ceiling ─▶ transcribe whole file   (1 fragment)
//!         └─ duration > ceiling ─▶ ScratchDir::new
//!               └─▶ split into segments     [spawn_blocking]
//!                     └─▶ transcribe each segment, ascending index order
//!   └─▶ assemble TranscriptResult
//! ```
//!
//! Scheduling is strictly sequential: each external call blocks the pipeline
//! until it returns, and segment N+1 is never sent before segment N's
//! response has arrived. The scratch directory is dropped on every exit path
//! out of the long branch, so segment files never outlive the run.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::media::{
    expected_segments, DurationProber, MediaSegmenter, ProbeError, ScratchDir, SplitError,
};
use crate::pipeline::transcript::{ChunkInfo, Fragment, TranscriptResult};
use crate::stt::{SpeechToText, SttError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run. Every variant is fatal; no stage is
/// retried and no partial transcript is kept.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Duration could not be determined; nothing downstream can proceed.
    #[error("could not determine audio duration: {0}")]
    Probe(#[from] ProbeError),

    /// Splitting failed; the scratch directory has already been removed.
    #[error("audio splitting failed: {0}")]
    Split(#[from] SplitError),

    /// A transcription call failed; completed fragments are discarded.
    #[error("transcription failed: {0}")]
    Stt(#[from] SttError),

    /// The scratch directory could not be created.
    #[error("could not create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    /// A background task failed to complete (e.g. panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// TranscriptionPipeline
// ---------------------------------------------------------------------------

/// Drives one recording through the full transcription pipeline.
///
/// Create with [`TranscriptionPipeline::new`], then call
/// [`run`](Self::run) once per recording. The same instance (and the
/// network client inside the injected [`SpeechToText`]) is reused across
/// all segments of a run.
pub struct TranscriptionPipeline {
    prober: Arc<dyn DurationProber>,
    segmenter: Arc<dyn MediaSegmenter>,
    stt: Arc<dyn SpeechToText>,
    max_segment_secs: u32,
    utc_offset_hours: i32,
}

impl TranscriptionPipeline {
    /// Create a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `prober`    — duration inspection adapter (e.g. `FfprobeProber`).
    /// * `segmenter` — splitting adapter (e.g. `FfmpegSegmenter`).
    /// * `stt`       — transcription backend (e.g. `ApiTranscriber`).
    /// * `config`    — segmentation ceiling and reporting offset.
    pub fn new(
        prober: Arc<dyn DurationProber>,
        segmenter: Arc<dyn MediaSegmenter>,
        stt: Arc<dyn SpeechToText>,
        config: &AppConfig,
    ) -> Self {
        Self {
            prober,
            segmenter,
            stt,
            max_segment_secs: config.segmentation.max_segment_secs,
            utc_offset_hours: config.report.utc_offset_hours,
        }
    }

    /// Transcribe `source` and return the assembled result.
    ///
    /// The source file is read-only throughout; all derived files live in a
    /// scratch directory that is removed before this function returns,
    /// whether it returns `Ok` or `Err`.
    pub async fn run(&self, source: &Path) -> Result<TranscriptResult, PipelineError> {
        // ── 1. Probe duration (blocking → thread pool) ───────────────────
        let prober = Arc::clone(&self.prober);
        let probe_target = source.to_path_buf();
        let duration = tokio::task::spawn_blocking(move || prober.probe(&probe_target))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))??;

        log::info!(
            "audio duration: {duration:.1}s ({:.1} minutes)",
            duration / 60.0
        );

        // ── 2. One explicit branch: short vs. long ───────────────────────
        let ceiling = self.max_segment_secs;
        let (fragments, chunks) = if duration <= f64::from(ceiling) {
            let text = self.stt.transcribe_file(source).await?;
            (vec![Fragment { index: 0, text }], None)
        } else {
            let planned = expected_segments(duration, ceiling);
            log::info!("duration exceeds {ceiling}s ceiling, splitting into {planned} segments");

            // The scratch directory is owned by this scope: any `?` below
            // drops it, which removes every segment file with it.
            let scratch = ScratchDir::new().map_err(PipelineError::Scratch)?;

            let segmenter = Arc::clone(&self.segmenter);
            let split_source = source.to_path_buf();
            let dest = scratch.path().to_path_buf();
            let segments =
                tokio::task::spawn_blocking(move || segmenter.split(&split_source, ceiling, &dest))
                    .await
                    .map_err(|e| PipelineError::Internal(e.to_string()))??;

            log::info!("created {} segments", segments.len());

            let mut fragments = Vec::with_capacity(segments.len());
            for segment in &segments {
                log::info!("transcribing segment {}/{}", segment.index + 1, segments.len());
                let text = self.stt.transcribe_file(&segment.path).await?;
                fragments.push(Fragment {
                    index: segment.index,
                    text,
                });
            }

            let chunks = ChunkInfo {
                count: segments.len(),
                chunk_duration_seconds: ceiling,
            };
            (fragments, Some(chunks))
        };

        // ── 3. Aggregate ─────────────────────────────────────────────────
        Ok(TranscriptResult::assemble(
            fragments,
            source,
            duration,
            chunks,
            self.utc_offset_hours,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
