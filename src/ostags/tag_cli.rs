use crate::models::TagSet;
use crate::ostags::OsTagStore;
use crate::utils;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;

/// OS tag store backed by the `tag` command line tool (macOS Finder tags)
pub struct TagCli {
    executable: String,
}

impl TagCli {
    pub fn new() -> Self {
        Self {
            executable: "tag".to_string(),
        }
    }

    /// Set the tag executable name (default: "tag")
    pub fn with_executable<S: Into<String>>(mut self, executable: S) -> Self {
        self.executable = executable.into();
        self
    }

    fn list_args(path: &Path) -> Vec<OsString> {
        vec!["--list".into(), path.as_os_str().to_owned()]
    }

    fn set_args(path: &Path, tags: &TagSet) -> Vec<OsString> {
        vec![
            "--set".into(),
            tags.to_cli_string().into(),
            path.as_os_str().to_owned(),
        ]
    }
}

impl Default for TagCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl OsTagStore for TagCli {
    async fn list_tags(&self, path: &Path) -> Result<TagSet> {
        let output = utils::run_tool(&self.executable, Self::list_args(path))
            .await
            .with_context(|| format!("Failed to get OS tags for {}", path.display()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(utils::parse_tag_listing(&stdout, path))
    }

    async fn set_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        utils::run_tool(&self.executable, Self::set_args(path, tags))
            .await
            .with_context(|| format!("Failed to set OS tags for {}", path.display()))?;
        Ok(())
    }
}
