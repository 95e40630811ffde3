use crate::extractor::ContentExtractor;
use crate::models::{MediaFile, MediaKind};
use anyhow::{Context, Result};

/// Plain text extractor: the file content as-is
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContentExtractor for TextExtractor {
    async fn extract(&self, file: &MediaFile) -> Result<String> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .with_context(|| format!("Failed to read text file: {}", file.path.display()))?;
        // Legacy encodings still yield usable keywords
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Text
    }
}
