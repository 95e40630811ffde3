use anyhow::Result;
use std::path::Path;

/// Trait for the media transcoding toolkit (probe, extract, remux)
#[async_trait::async_trait]
pub trait MediaTool: Send + Sync {
    /// Codec name of the first audio stream, `None` when the file has no audio
    async fn probe_audio_codec(&self, video: &Path) -> Result<Option<String>>;

    /// Container-level comment field, `None` when unset
    async fn probe_comment(&self, video: &Path) -> Result<Option<String>>;

    /// Copy the first audio stream into `output` without re-encoding
    async fn extract_audio(&self, video: &Path, output: &Path) -> Result<()>;

    /// Copy every stream of `input` into `output` with a new comment field
    async fn remux_with_comment(&self, input: &Path, output: &Path, comment: &str) -> Result<()>;
}
