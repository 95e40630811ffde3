use crate::models::Transcription;
use crate::transcriber::Transcriber;
use crate::utils;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Transcriber driving the `whisper` command line tool
pub struct WhisperCli {
    executable: String,
    model: String,
}

/// Subset of the JSON document whisper writes with `--output_format json`
#[derive(Deserialize)]
struct WhisperOutput {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl WhisperCli {
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            executable: "whisper".to_string(),
            model: model.into(),
        }
    }

    /// Set the whisper executable name (default: "whisper")
    pub fn with_executable<S: Into<String>>(mut self, executable: S) -> Self {
        self.executable = executable.into();
        self
    }

    /// Where whisper writes its JSON for a given audio file
    fn output_path(audio: &Path, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.json", utils::file_stem(audio)))
    }

    fn args(&self, audio: &Path, output_dir: &Path) -> Vec<OsString> {
        vec![
            audio.as_os_str().to_owned(),
            "--model".into(),
            self.model.clone().into(),
            "--output_format".into(),
            "json".into(),
            "--output_dir".into(),
            output_dir.as_os_str().to_owned(),
            "--verbose".into(),
            "False".into(),
        ]
    }

    pub(crate) fn parse_output(raw: &str) -> Result<Transcription> {
        let output: WhisperOutput =
            serde_json::from_str(raw).context("Failed to parse whisper output")?;
        Ok(Transcription {
            language: output
                .language
                .filter(|lang| !lang.trim().is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            transcript: output.text.trim().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio: &Path) -> Result<Transcription> {
        let output_dir = audio
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        utils::run_tool(&self.executable, self.args(audio, &output_dir))
            .await
            .with_context(|| format!("Failed to transcribe {}", audio.display()))?;

        let json_path = Self::output_path(audio, &output_dir);
        let raw = tokio::fs::read_to_string(&json_path)
            .await
            .with_context(|| format!("Failed to read whisper output: {}", json_path.display()))?;
        let transcription = Self::parse_output(&raw)?;

        // Only the normalized transcription file is kept
        if let Err(e) = tokio::fs::remove_file(&json_path).await {
            tracing::debug!("Could not remove {}: {}", json_path.display(), e);
        }

        Ok(transcription)
    }
}
