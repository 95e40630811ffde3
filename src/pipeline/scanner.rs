use crate::models::{MediaFile, MediaKind};
use crate::utils;
use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Decide whether a path is a supported media file.
///
/// Rejects anything that is not a regular file, hidden and resource-fork
/// artifacts, and unsupported extensions.
pub fn classify(path: &Path) -> Option<MediaKind> {
    if !path.is_file() || utils::is_hidden_artifact(path) {
        return None;
    }
    utils::get_extension(path).and_then(|ext| MediaKind::from_extension(&ext))
}

/// Walk `root` and collect every supported file, in filesystem order
pub fn discover(root: &Path) -> Result<Vec<MediaFile>> {
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match classify(path) {
            Some(kind) => files.push(MediaFile::new(path.to_path_buf(), kind)),
            None => tracing::debug!("Skipped file: {}", path.display()),
        }
    }
    Ok(files)
}
