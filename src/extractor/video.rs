use crate::constants::audio_extension_for_codec;
use crate::error::TagError;
use crate::extractor::ContentExtractor;
use crate::media::MediaTool;
use crate::models::{MediaFile, MediaKind, Transcription};
use crate::transcriber::Transcriber;
use crate::utils;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Video extractor: audio track → transcript.
///
/// Both the extracted audio and the transcription JSON live at derived paths
/// and are reused when already on disk.
pub struct VideoExtractor {
    media: Arc<dyn MediaTool>,
    transcriber: Arc<dyn Transcriber>,
}

impl VideoExtractor {
    pub fn new(media: Arc<dyn MediaTool>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self { media, transcriber }
    }

    /// Locate or create the extracted audio track, `None` when there is no audio
    pub async fn audio_track(&self, video: &Path) -> Result<Option<PathBuf>> {
        let codec = match self.media.probe_audio_codec(video).await? {
            Some(codec) => codec,
            None => return Ok(None),
        };
        let audio = utils::audio_path(video, audio_extension_for_codec(&codec));

        if audio.exists() {
            tracing::info!("Audio already extracted: {}", audio.display());
            return Ok(Some(audio));
        }

        let dir = utils::audio_dir(video);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        self.media.extract_audio(video, &audio).await?;
        tracing::info!("Audio extracted from {} to {}", video.display(), audio.display());
        Ok(Some(audio))
    }

    /// Load the stored transcription or transcribe and store it
    pub async fn transcription(&self, audio: &Path) -> Result<Transcription> {
        let json_path = utils::transcription_path(audio);

        if json_path.exists() {
            tracing::info!("Transcription already exists: {}", json_path.display());
            let raw = tokio::fs::read_to_string(&json_path)
                .await
                .with_context(|| format!("Failed to read {}", json_path.display()))?;
            let transcription = serde_json::from_str(&raw).map_err(|source| {
                TagError::InvalidSidecar {
                    path: json_path.clone(),
                    source,
                }
            })?;
            return Ok(transcription);
        }

        let transcription = self.transcriber.transcribe(audio).await?;
        let json = serde_json::to_string_pretty(&transcription)?;
        tokio::fs::write(&json_path, json)
            .await
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        tracing::info!("Transcription saved to {}", json_path.display());
        Ok(transcription)
    }
}

#[async_trait::async_trait]
impl ContentExtractor for VideoExtractor {
    async fn extract(&self, file: &MediaFile) -> Result<String> {
        let audio = match self.audio_track(&file.path).await? {
            Some(audio) => audio,
            None => {
                tracing::info!("No audio stream in {}", file.path.display());
                return Ok(String::new());
            }
        };

        let transcription = self.transcription(&audio).await?;
        tracing::info!(
            "Transcription ({}): {}...",
            transcription.language,
            transcription.first_sentence()
        );
        Ok(transcription.transcript)
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Video
    }
}
