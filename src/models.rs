use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{PDF_EXTENSIONS, TEXT_EXTENSIONS, VIDEO_EXTENSIONS};

/// The three media families the tagger understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Pdf,
    Text,
    Video,
}

impl MediaKind {
    /// Map a lowercase extension (without the dot) to a media kind
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if PDF_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Pdf)
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Text)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "text",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported file discovered during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Full path to the file
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Whether an idempotence marker was found for this file
    pub tagged: bool,
}

impl MediaFile {
    pub fn new(path: PathBuf, kind: MediaKind) -> Self {
        Self {
            path,
            kind,
            tagged: false,
        }
    }

    pub fn with_tagged(mut self, tagged: bool) -> Self {
        self.tagged = tagged;
        self
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Small ordered set of keyword strings attached to one file.
///
/// Insertion order is kept (it carries the model's ranking) but duplicates are
/// rejected, so a tag can only appear once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a tag, returning false when it was blank or already present
    pub fn insert<S: Into<String>>(&mut self, tag: S) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Serialized form used by the PDF keywords and video comment fields
    pub fn to_field_string(&self) -> String {
        self.0.join(", ")
    }

    /// Serialized form passed to the OS tag tool
    pub fn to_cli_string(&self) -> String {
        self.0.join(",")
    }

    /// Parse a comma separated field; whitespace around each tag is ignored
    pub fn parse_field(value: &str) -> Self {
        value.split(',').collect()
    }

    /// Compare membership, ignoring order
    pub fn same_tags(&self, other: &TagSet) -> bool {
        let left: HashSet<&str> = self.0.iter().map(String::as_str).collect();
        let right: HashSet<&str> = other.0.iter().map(String::as_str).collect();
        left == right
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Stored lists go through `insert`, dropping blanks and repeats
impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field_string())
    }
}

/// Result of transcribing an audio track, persisted as `<stem>_transcription.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcription {
    #[serde(default = "unknown_language")]
    pub language: String,
    pub transcript: String,
}

fn unknown_language() -> String {
    "unknown".to_string()
}

impl Transcription {
    /// First sentence of the transcript, used for log previews
    pub fn first_sentence(&self) -> &str {
        self.transcript.split('.').next().unwrap_or_default().trim()
    }
}
