use crate::models::TagSet;
use anyhow::Result;
use std::path::Path;

/// Trait for the operating system's file tag store.
///
/// This store is independent of the tags held in file content.
#[async_trait::async_trait]
pub trait OsTagStore: Send + Sync {
    async fn list_tags(&self, path: &Path) -> Result<TagSet>;

    /// Replace every OS tag of `path` with `tags`
    async fn set_tags(&self, path: &Path, tags: &TagSet) -> Result<()>;
}
