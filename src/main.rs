//! Command-line entry point — meeting audio in, transcript JSON out.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the two positional arguments (clap prints usage and exits
//!    non-zero on a missing or extra argument).
//! 3. Pre-flight checks, all before any external call: input file exists,
//!    extension is supported, the service credential is set.
//! 4. Load [`AppConfig`] from disk (defaults when the file is missing).
//! 5. Create the tokio runtime (current-thread — the pipeline is strictly
//!    sequential).
//! 6. Build the concrete adapters and run the pipeline.
//! 7. Write the result JSON to the output path.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use meeting_scribe::config::AppConfig;
use meeting_scribe::media::{self, FfmpegSegmenter, FfprobeProber};
use meeting_scribe::pipeline::TranscriptionPipeline;
use meeting_scribe::stt::{ApiTranscriber, SpeechToText};

/// Environment variable holding the speech-to-text service credential.
const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Transcribe meeting audio with a hosted speech-to-text service.
///
/// Long recordings are split into segments under the service's duration
/// limit, transcribed in order, and reassembled into one transcript.
#[derive(Parser, Debug)]
#[command(name = "meeting-scribe")]
struct Cli {
    /// Input audio file (.mp3 .mp4 .wav .m4a .webm .ogg .flac).
    input: PathBuf,

    /// Output path for the transcript JSON.
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // ── Pre-flight checks, before any external call ──────────────────────
    if !cli.input.exists() {
        bail!("file not found: {}", cli.input.display());
    }

    if !media::is_supported(&cli.input) {
        let ext = media::extension_of(&cli.input).unwrap_or_default();
        bail!(
            "unsupported format '.{ext}'. Supported: {}",
            media::SUPPORTED_EXTENSIONS
                .map(|e| format!(".{e}"))
                .join(" ")
        );
    }

    let api_key = std::env::var(API_KEY_VAR)
        .with_context(|| format!("{API_KEY_VAR} environment variable not set"))?;

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // Current-thread runtime: the pipeline transcribes segments one at a
    // time, in sequence order.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let stt: Arc<dyn SpeechToText> = Arc::new(ApiTranscriber::from_config(&config.stt, api_key));
    let pipeline = TranscriptionPipeline::new(
        Arc::new(FfprobeProber::new()),
        Arc::new(FfmpegSegmenter::new()),
        stt,
        &config,
    );

    log::info!("transcribing: {}", cli.input.display());
    let result = rt.block_on(pipeline.run(&cli.input))?;

    result
        .write_to(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    log::info!(
        "transcript saved: {} ({} characters)",
        cli.output.display(),
        result.transcript.chars().count()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn two_positional_arguments_parse() {
        let cli = Cli::try_parse_from(["meeting-scribe", "in.mp3", "out.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.mp3"));
        assert_eq!(cli.output, PathBuf::from("out.json"));
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        let err = Cli::try_parse_from(["meeting-scribe", "in.mp3"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_argument_is_a_usage_error() {
        let err =
            Cli::try_parse_from(["meeting-scribe", "in.mp3", "out.json", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn missing_input_fails_before_any_external_call() {
        let cli = Cli {
            input: PathBuf::from("/nonexistent/meeting.mp3"),
            output: PathBuf::from("/tmp/out.json"),
        };
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn unsupported_extension_fails_before_any_external_call() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"not audio").unwrap();

        let cli = Cli {
            input,
            output: dir.path().join("out.json"),
        };
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("unsupported format '.txt'"));
    }
}
