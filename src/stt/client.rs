//! Core `SpeechToText` trait and `ApiTranscriber` implementation.
//!
//! `ApiTranscriber` posts one audio file per call to an OpenAI-compatible
//! `/audio/transcriptions` endpoint as a multipart form and returns the
//! recognized text. Exactly one network call per invocation: no retries, no
//! caching — a failed call aborts the whole run by design.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use thiserror::Error;

use crate::config::SttConfig;
use crate::media::format;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// Errors that can occur while transcribing one audio file.
#[derive(Debug, Error)]
pub enum SttError {
    /// The audio file could not be read from disk.
    #[error("failed to read audio file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport or connection error.
    #[error("transcription request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("transcription service returned status {status}: {body}")]
    Service { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SttError {
    fn from(e: reqwest::Error) -> Self {
        SttError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// SpeechToText trait
// ---------------------------------------------------------------------------

/// Async trait for hosted speech-to-text backends.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn SpeechToText>`.
///
/// # Contract
///
/// - `audio` must be a file in one of the supported formats.
/// - Exactly one network call per invocation; transient failures propagate.
/// - The returned text is exactly what the service produced — no trimming,
///   no normalization, possibly empty when no speech was recognized.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe_file(&self, audio: &Path) -> Result<String, SttError>;
}

// ---------------------------------------------------------------------------
// ApiTranscriber
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/audio/transcriptions` endpoint.
///
/// The reqwest client is built once and reused for every segment of a run —
/// construct the transcriber up front and inject it into the pipeline. All
/// connection details come from [`SttConfig`]; the credential is passed
/// separately so it never travels through the config file.
pub struct ApiTranscriber {
    client: reqwest::Client,
    config: SttConfig,
    api_key: String,
}

impl ApiTranscriber {
    /// Build an `ApiTranscriber` from application config plus the service
    /// credential.
    pub fn from_config(config: &SttConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SpeechToText for ApiTranscriber {
    async fn transcribe_file(&self, audio: &Path) -> Result<String, SttError> {
        let bytes = tokio::fs::read(audio).await.map_err(|e| SttError::ReadFile {
            path: audio.display().to_string(),
            source: e,
        })?;

        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();
        let ext = format::extension_of(audio).unwrap_or_default();

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(format::mime_for(&ext))
            .map_err(|e| SttError::Request(format!("mime: {e}")))?;

        let form = multipart::Form::new()
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .part("file", file_part);

        let url = format!("{}/audio/transcriptions", self.config.base_url);
        log::debug!("uploading {} to {url}", audio.display());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SttError::Service { status, body });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SttError::Parse(e.to_string()))?;

        // The text is kept byte-for-byte as the service produced it.
        let text = json["text"]
            .as_str()
            .ok_or_else(|| SttError::Parse("response has no \"text\" field".into()))?;

        log::debug!("received {} characters", text.len());
        Ok(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays scripted responses and records the order of
/// files it was asked to transcribe.
#[cfg(test)]
pub struct MockTranscriber {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<String, String>>>,
    calls: std::sync::Mutex<Vec<std::path::PathBuf>>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that answers each call with the next scripted reply;
    /// `Err(msg)` entries become [`SttError::Request`] failures.
    pub fn scripted(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: std::sync::Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// File paths received so far, in call order.
    pub fn calls(&self) -> Vec<std::path::PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechToText for MockTranscriber {
    async fn transcribe_file(&self, audio: &Path) -> Result<String, SttError> {
        self.calls.lock().unwrap().push(audio.to_path_buf());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(SttError::Request(msg)),
            None => Err(SttError::Request("no scripted reply left".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_config() -> SttConfig {
        SttConfig {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-transcribe".into(),
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _transcriber = ApiTranscriber::from_config(&make_config(), "sk-test-1234");
    }

    /// Verify that `ApiTranscriber` is object-safe (usable as `dyn SpeechToText`).
    #[test]
    fn transcriber_is_object_safe() {
        let transcriber: Box<dyn SpeechToText> =
            Box::new(ApiTranscriber::from_config(&make_config(), "sk-test"));
        drop(transcriber);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let transcriber = ApiTranscriber::from_config(&make_config(), "sk-test");
        let err = transcriber
            .transcribe_file(Path::new("/nonexistent/audio.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SttError::ReadFile { .. }));
        assert!(err.to_string().contains("/nonexistent/audio.mp3"));
    }

    // --- MockTranscriber ---

    #[tokio::test]
    async fn mock_replays_replies_in_order() {
        let mock = MockTranscriber::scripted(vec![Ok("first"), Ok("second")]);

        assert_eq!(
            mock.transcribe_file(Path::new("a.mp3")).await.unwrap(),
            "first"
        );
        assert_eq!(
            mock.transcribe_file(Path::new("b.mp3")).await.unwrap(),
            "second"
        );
        assert_eq!(
            mock.calls(),
            vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp3")]
        );
    }

    #[tokio::test]
    async fn mock_scripted_failure_is_a_request_error() {
        let mock = MockTranscriber::scripted(vec![Err("quota exceeded")]);
        let err = mock.transcribe_file(Path::new("a.mp3")).await.unwrap_err();
        assert!(matches!(err, SttError::Request(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn mock_exhausted_script_fails() {
        let mock = MockTranscriber::scripted(vec![]);
        assert!(mock.transcribe_file(Path::new("a.mp3")).await.is_err());
    }
}
