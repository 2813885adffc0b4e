//! Speech-to-text module.
//!
//! This module provides:
//! * [`SpeechToText`] — async trait implemented by all transcription backends.
//! * [`ApiTranscriber`] — hosted OpenAI-compatible transcription client.
//! * [`SttError`] — error variants for transcription operations.

pub mod client;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use client::{ApiTranscriber, SpeechToText, SttError};

// test-only re-export so the pipeline test module can import MockTranscriber
// without `use meeting_scribe::stt::client::MockTranscriber`.
#[cfg(test)]
pub use client::MockTranscriber;
