use crate::models::{MediaKind, TagSet};
use anyhow::Result;
use std::path::Path;

/// Trait for the per-format containers persisting a file's tags
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Read the stored tags; a file without a record yields an empty set
    async fn read(&self, path: &Path) -> Result<TagSet>;

    /// Write `tags` for the content of `source` into `target`.
    ///
    /// `target` may equal `source` (rewrite in place) or name a new sibling.
    async fn write_to(&self, source: &Path, target: &Path, tags: &TagSet) -> Result<()>;

    /// Rewrite `path` with `tags`
    async fn write(&self, path: &Path, tags: &TagSet) -> Result<()> {
        self.write_to(path, path, tags).await
    }

    /// Whether a tagged copy can be produced instead of rewriting in place
    fn supports_copy(&self) -> bool {
        true
    }

    /// Check if this store handles the given media kind
    fn supports(&self, kind: MediaKind) -> bool;
}
