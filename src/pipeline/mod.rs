//! Pipeline module — orchestration and transcript aggregation.
//!
//! [`TranscriptionPipeline`] drives one recording end to end;
//! [`TranscriptResult`] is the record it produces. The aggregation helpers
//! in [`transcript`] are pure functions so ordering guarantees can be tested
//! without any I/O.

pub mod runner;
pub mod transcript;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use runner::{PipelineError, TranscriptionPipeline};
pub use transcript::{join_fragments, ChunkInfo, Fragment, TranscriptResult};
