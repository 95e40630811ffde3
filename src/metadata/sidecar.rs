use crate::error::TagError;
use crate::metadata::MetadataStore;
use crate::models::{MediaKind, TagSet};
use crate::utils;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON document stored next to a text file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SidecarDocument {
    #[serde(default)]
    tags: TagSet,
}

/// Tags for plain text files, kept in `<stem>_metadata.json`
pub struct SidecarStore;

impl SidecarStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SidecarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MetadataStore for SidecarStore {
    async fn read(&self, path: &Path) -> Result<TagSet> {
        let sidecar = utils::sidecar_path(path);
        let raw = match tokio::fs::read_to_string(&sidecar).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TagSet::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", sidecar.display()))
            }
        };

        let doc: SidecarDocument = serde_json::from_str(&raw).map_err(|source| {
            TagError::InvalidSidecar {
                path: sidecar.clone(),
                source,
            }
        })?;
        Ok(doc.tags)
    }

    async fn write_to(&self, _source: &Path, target: &Path, tags: &TagSet) -> Result<()> {
        let sidecar = utils::sidecar_path(target);
        let doc = SidecarDocument { tags: tags.clone() };
        let json = serde_json::to_string(&doc)?;
        tokio::fs::write(&sidecar, json)
            .await
            .with_context(|| format!("Failed to write {}", sidecar.display()))?;
        tracing::info!("Metadata saved at: {}", sidecar.display());
        Ok(())
    }

    fn supports_copy(&self) -> bool {
        false
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Text
    }
}
