use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_OVER_FETCH, DEFAULT_TOP_N};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tagging: TaggingConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// How a file is recognised as already tagged
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStrategy {
    /// Existing content metadata or OS tags
    #[default]
    Metadata,
    /// Stem ends with `_tagged`
    Suffix,
}

/// Where generated tags for PDFs and videos are written
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Rewrite the original file
    #[default]
    InPlace,
    /// Write a `<stem>_tagged.<ext>` sibling
    TaggedCopy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_over_fetch")]
    pub over_fetch: usize,
    #[serde(default)]
    pub marker: MarkerStrategy,
    #[serde(default)]
    pub output: OutputMode,
    /// Overwrite existing tagged copies without asking
    #[serde(default)]
    pub assume_yes: bool,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_over_fetch() -> usize {
    DEFAULT_OVER_FETCH
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            over_fetch: DEFAULT_OVER_FETCH,
            marker: MarkerStrategy::default(),
            output: OutputMode::default(),
            assume_yes: false,
        }
    }
}

/// Executable names of the external collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub tag: String,
    pub whisper: String,
    pub whisper_model: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            tag: "tag".to_string(),
            whisper: "whisper".to_string(),
            whisper_model: "base".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordsConfig {
    /// `frequency` (built in) or `ollama`
    pub provider: String,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            provider: "frequency".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path when given, otherwise search the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
                Self::from_file(expanded)
            }
            None => Self::load(),
        }
    }

    fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config/settings.toml"),
            PathBuf::from("./config/settings.toml"),
            PathBuf::from(shellexpand::tilde("~/.config/mediatag/settings.toml").into_owned()),
        ]
    }
}
