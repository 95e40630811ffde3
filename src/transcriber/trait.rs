use crate::models::Transcription;
use anyhow::Result;
use std::path::Path;

/// Trait for speech-to-text engines
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file, detecting its spoken language
    async fn transcribe(&self, audio: &Path) -> Result<Transcription>;
}
