//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! The defaults reproduce the service limits the pipeline was built around:
//! the hosted transcription endpoint rejects inputs above 1400 seconds, so
//! the segmentation ceiling sits at 1300 to leave headroom.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted speech-to-text service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Base URL of the API, up to and including the version prefix.
    pub base_url: String,
    /// Model identifier sent with every transcription request.
    pub model: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-transcribe".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SegmentationConfig
// ---------------------------------------------------------------------------

/// Settings for duration-based splitting of long recordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Maximum duration, in seconds, of a single unit submitted to the
    /// service. Inputs longer than this are split into segments of at most
    /// this length.
    pub max_segment_secs: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_segment_secs: 1300,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportConfig
// ---------------------------------------------------------------------------

/// Settings for the result record written at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// UTC offset, in whole hours, used for the `processed_at` timestamp.
    /// Defaults to +9 (KST).
    pub utc_offset_hours: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { utc_offset_hours: 9 }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use meeting_scribe::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hosted speech-to-text settings.
    pub stt: SttConfig,
    /// Splitting settings for long recordings.
    pub segmentation: SegmentationConfig,
    /// Result-record settings.
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.stt.base_url, loaded.stt.base_url);
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(
            original.segmentation.max_segment_secs,
            loaded.segmentation.max_segment_secs
        );
        assert_eq!(
            original.report.utc_offset_hours,
            loaded.report.utc_offset_hours
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.stt.model, default.stt.model);
        assert_eq!(
            config.segmentation.max_segment_secs,
            default.segmentation.max_segment_secs
        );
    }

    /// Default values must match the service limits the pipeline targets.
    #[test]
    fn default_values_match_service_limits() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.stt.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.stt.model, "gpt-4o-transcribe");
        assert_eq!(cfg.segmentation.max_segment_secs, 1300);
        assert_eq!(cfg.report.utc_offset_hours, 9);
    }

    /// Modified non-default values must survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.stt.base_url = "https://stt.example.com/v1".into();
        cfg.stt.model = "whisper-1".into();
        cfg.segmentation.max_segment_secs = 600;
        cfg.report.utc_offset_hours = 0;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.stt.base_url, "https://stt.example.com/v1");
        assert_eq!(loaded.stt.model, "whisper-1");
        assert_eq!(loaded.segmentation.max_segment_secs, 600);
        assert_eq!(loaded.report.utc_offset_hours, 0);
    }
}
