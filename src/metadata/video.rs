use crate::media::MediaTool;
use crate::metadata::MetadataStore;
use crate::models::{MediaKind, TagSet};
use crate::utils;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Tags for video files, kept in the container comment field
pub struct VideoCommentStore {
    media: Arc<dyn MediaTool>,
}

impl VideoCommentStore {
    pub fn new(media: Arc<dyn MediaTool>) -> Self {
        Self { media }
    }
}

#[async_trait::async_trait]
impl MetadataStore for VideoCommentStore {
    async fn read(&self, path: &Path) -> Result<TagSet> {
        let comment = self.media.probe_comment(path).await?;
        Ok(comment
            .map(|comment| TagSet::parse_field(&comment))
            .unwrap_or_default())
    }

    async fn write_to(&self, source: &Path, target: &Path, tags: &TagSet) -> Result<()> {
        // The muxer cannot write over its own input, so go through a sibling
        let temp = utils::temp_sibling(target);
        if let Err(e) = self
            .media
            .remux_with_comment(source, &temp, &tags.to_field_string())
            .await
        {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e);
        }

        tokio::fs::rename(&temp, target)
            .await
            .with_context(|| format!("Failed to replace {}", target.display()))?;
        tracing::info!("Tagged video saved at: {}", target.display());
        Ok(())
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Video
    }
}
