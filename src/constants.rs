//! Constants used throughout mediatag
//! This module centralizes file naming conventions and tool mappings

/// Extensions handled as PDF documents
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Extensions handled as plain text
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Extensions handled as video containers
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm"];

/// Prefix of macOS resource-fork artifacts (`._name`) left on foreign filesystems
pub const RESOURCE_FORK_PREFIX: &str = "._";

/// Suffix appended to the stem of a text file for its tag sidecar
pub const METADATA_SIDECAR_SUFFIX: &str = "_metadata.json";

/// Suffix appended to the stem of an audio track for its transcription
pub const TRANSCRIPTION_SUFFIX: &str = "_transcription.json";

/// Legacy stem suffix marking a file that was written by the tagger
pub const TAGGED_STEM_SUFFIX: &str = "_tagged";

/// Container used when the audio codec has no natural mapping
pub const DEFAULT_AUDIO_EXTENSION: &str = "m4a";

/// Audio codec name (as reported by ffprobe) to the container extension it is copied into
pub const CODEC_EXTENSIONS: &[(&str, &str)] = &[
    ("aac", "aac"),
    ("mp3", "mp3"),
    ("vorbis", "ogg"),
    ("opus", "opus"),
    ("flac", "flac"),
    ("pcm_s16le", "wav"),
];

/// Default number of tags generated per file
pub const DEFAULT_TOP_N: usize = 5;

/// Candidate multiplier compensating for plural/singular collapses
pub const DEFAULT_OVER_FETCH: usize = 2;

/// Look up the audio container extension for a codec name
pub fn audio_extension_for_codec(codec: &str) -> &'static str {
    CODEC_EXTENSIONS
        .iter()
        .find(|(name, _)| *name == codec.trim())
        .map(|(_, ext)| *ext)
        .unwrap_or(DEFAULT_AUDIO_EXTENSION)
}
