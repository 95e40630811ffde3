use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::constants::{
    METADATA_SIDECAR_SUFFIX, RESOURCE_FORK_PREFIX, TAGGED_STEM_SUFFIX, TRANSCRIPTION_SUFFIX,
};
use crate::error::TagError;
use crate::models::TagSet;

/// Get file extension from path (without the dot)
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// File name without its last extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Hidden files and resource-fork artifacts never carry user content
pub fn is_hidden_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with(RESOURCE_FORK_PREFIX) || name.starts_with('.'))
        .unwrap_or(false)
}

/// `<dir>/<stem>_metadata.json` next to a text file
pub fn sidecar_path(path: &Path) -> PathBuf {
    sibling(path, &format!("{}{}", file_stem(path), METADATA_SIDECAR_SUFFIX))
}

/// Directory holding the extracted audio of a video: `<dir>/<stem>/`
pub fn audio_dir(video: &Path) -> PathBuf {
    sibling(video, &file_stem(video))
}

/// `<dir>/<stem>/<stem>.<ext>` for an extracted audio track
pub fn audio_path(video: &Path, audio_extension: &str) -> PathBuf {
    let stem = file_stem(video);
    audio_dir(video).join(format!("{}.{}", stem, audio_extension))
}

/// `<audio dir>/<audio stem>_transcription.json`
pub fn transcription_path(audio: &Path) -> PathBuf {
    sibling(audio, &format!("{}{}", file_stem(audio), TRANSCRIPTION_SUFFIX))
}

/// `<dir>/<stem>_tagged.<ext>` written in tagged-copy mode
pub fn tagged_copy_path(path: &Path) -> PathBuf {
    let name = match get_extension_raw(path) {
        Some(ext) => format!("{}{}.{}", file_stem(path), TAGGED_STEM_SUFFIX, ext),
        None => format!("{}{}", file_stem(path), TAGGED_STEM_SUFFIX),
    };
    sibling(path, &name)
}

/// Temporary sibling used while rewriting a file, keeps the extension so tools
/// can infer the container format
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = match get_extension_raw(path) {
        Some(ext) => format!(".{}.mediatag-tmp.{}", file_stem(path), ext),
        None => format!(".{}.mediatag-tmp", file_stem(path)),
    };
    sibling(path, &name)
}

/// Legacy marker: the stem ends with `_tagged`
pub fn has_tagged_suffix(path: &Path) -> bool {
    file_stem(path).ends_with(TAGGED_STEM_SUFFIX)
}

fn get_extension_raw(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().into_owned())
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Parse the output of a tag listing.
///
/// Depending on the tool version the output is `path<TAB>a,b`, `path\na, b`
/// or only the tag list. The path prefix is removed before splitting.
pub fn parse_tag_listing(output: &str, path: &Path) -> TagSet {
    let mut body = output.trim();
    let path_str = path.to_string_lossy();
    if let Some(rest) = body.strip_prefix(path_str.as_ref()) {
        body = rest;
    }
    body.split(|c: char| c == ',' || c == '\n' || c == '\t')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Run an external program to completion on the blocking pool.
///
/// A spawn failure maps to `ToolUnavailable`; a non-zero exit maps to
/// `ExternalToolFailure`.
pub async fn run_tool(program: &str, args: Vec<OsString>) -> Result<Output> {
    let program = program.to_string();
    let output = tokio::task::spawn_blocking({
        let program = program.clone();
        move || Command::new(&program).args(&args).output()
    })
    .await?
    .map_err(|source| TagError::ToolUnavailable {
        tool: program.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(TagError::tool_failure(&program, &output).into());
    }
    Ok(output)
}
