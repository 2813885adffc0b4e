//! Configuration module for meeting-scribe.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for the platform config file location, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.
//!
//! The speech-to-text credential is deliberately **not** part of the config —
//! it is read from the environment at startup and never written to disk.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ReportConfig, SegmentationConfig, SttConfig};
