use crate::media::MediaTool;
use crate::utils;
use anyhow::{Context, Result};
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;

/// `MediaTool` implemented with the ffmpeg and ffprobe binaries
pub struct Ffmpeg {
    ffmpeg: String,
    ffprobe: String,
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Override the executable names
    pub fn with_executables<S: Into<String>>(mut self, ffmpeg: S, ffprobe: S) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    fn codec_args(video: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            "error".into(),
            "-select_streams".into(),
            "a:0".into(),
            "-show_entries".into(),
            "stream=codec_name".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            video.as_os_str().to_owned(),
        ]
    }

    fn tags_args(video: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format_tags".into(),
            "-of".into(),
            "json".into(),
            video.as_os_str().to_owned(),
        ]
    }

    fn extract_args(video: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            video.as_os_str().to_owned(),
            "-vn".into(),
            "-acodec".into(),
            "copy".into(),
            output.as_os_str().to_owned(),
        ]
    }

    fn remux_args(input: &Path, output: &Path, comment: &str) -> Vec<OsString> {
        vec![
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-map".into(),
            "0".into(),
            "-metadata".into(),
            format!("comment={}", comment).into(),
            "-c".into(),
            "copy".into(),
            output.as_os_str().to_owned(),
        ]
    }

    /// Pick the comment out of `ffprobe -of json` output; key case varies by container
    pub(crate) fn comment_from_probe(raw: &str) -> Result<Option<String>> {
        let probe: Value = serde_json::from_str(raw).context("Failed to parse ffprobe output")?;
        let comment = probe
            .get("format")
            .and_then(|format| format.get("tags"))
            .and_then(Value::as_object)
            .and_then(|tags| {
                tags.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("comment"))
                    .and_then(|(_, value)| value.as_str())
            })
            .map(|comment| comment.trim().to_string())
            .filter(|comment| !comment.is_empty());
        Ok(comment)
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MediaTool for Ffmpeg {
    async fn probe_audio_codec(&self, video: &Path) -> Result<Option<String>> {
        let output = utils::run_tool(&self.ffprobe, Self::codec_args(video))
            .await
            .with_context(|| format!("Failed to probe audio codec of {}", video.display()))?;
        let codec = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if codec.is_empty() { None } else { Some(codec) })
    }

    async fn probe_comment(&self, video: &Path) -> Result<Option<String>> {
        let output = utils::run_tool(&self.ffprobe, Self::tags_args(video))
            .await
            .with_context(|| format!("Failed to probe metadata of {}", video.display()))?;
        Self::comment_from_probe(&String::from_utf8_lossy(&output.stdout))
    }

    async fn extract_audio(&self, video: &Path, output: &Path) -> Result<()> {
        utils::run_tool(&self.ffmpeg, Self::extract_args(video, output))
            .await
            .with_context(|| format!("Failed to extract audio from {}", video.display()))?;
        Ok(())
    }

    async fn remux_with_comment(&self, input: &Path, output: &Path, comment: &str) -> Result<()> {
        utils::run_tool(&self.ffmpeg, Self::remux_args(input, output, comment))
            .await
            .with_context(|| format!("Failed to write metadata for {}", input.display()))?;
        Ok(())
    }
}
