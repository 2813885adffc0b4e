//! meeting-scribe — segmented transcription of recorded meeting audio.
//!
//! Converts a recorded meeting into plain text via a hosted speech-to-text
//! service. The service rejects inputs above a duration ceiling, so long
//! recordings are split into time-bounded segments (stream copy, no
//! re-encoding), transcribed one at a time in order, and reassembled into a
//! single transcript. Segment files live in a scoped scratch directory that
//! is removed on every exit path.
//!
//! # Pipeline
//!
//! ```text
//! source file ── probe duration ──┬─ duration ≤ ceiling ─▶ transcribe once ─┐
//!                                 │                                          ├─▶ TranscriptResult
//!                                 └─ duration > ceiling ─▶ split ─▶ transcribe│
//!                                        (scratch dir)      each, in order ──┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use meeting_scribe::config::AppConfig;
//! use meeting_scribe::media::{FfmpegSegmenter, FfprobeProber};
//! use meeting_scribe::pipeline::TranscriptionPipeline;
//! use meeting_scribe::stt::{ApiTranscriber, SpeechToText};
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let api_key = std::env::var("OPENAI_API_KEY").unwrap();
//!
//! let stt: Arc<dyn SpeechToText> = Arc::new(ApiTranscriber::from_config(&config.stt, api_key));
//! let pipeline = TranscriptionPipeline::new(
//!     Arc::new(FfprobeProber::new()),
//!     Arc::new(FfmpegSegmenter::new()),
//!     stt,
//!     &config,
//! );
//!
//! let result = pipeline.run("meeting.mp3".as_ref()).await.unwrap();
//! println!("{}", result.transcript);
//! # }
//! ```

pub mod config;
pub mod media;
pub mod pipeline;
pub mod stt;
