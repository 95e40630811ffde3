use crate::models::{MediaFile, MediaKind};
use anyhow::Result;

/// Trait for extractors that pull raw text out of a media file
#[async_trait::async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extract text content from a file; an empty string is a valid result
    async fn extract(&self, file: &MediaFile) -> Result<String>;

    /// Check if this extractor handles the given media kind
    fn supports(&self, kind: MediaKind) -> bool;
}
