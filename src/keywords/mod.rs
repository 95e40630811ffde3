pub mod frequency;
pub mod inflect;
pub mod ollama;
pub mod r#trait;

pub use frequency::FrequencyKeywordModel;
pub use inflect::EnglishInflector;
pub use ollama::OllamaKeywordModel;
pub use r#trait::{KeywordModel, ScoredKeyword, Singularizer};

use crate::config::Config;
use anyhow::Result;
use std::sync::Arc;

/// Build the keyword model selected in the configuration
pub fn model_from_config(config: &Config) -> Result<Arc<dyn KeywordModel>> {
    match config.keywords.provider.as_str() {
        "frequency" => Ok(Arc::new(FrequencyKeywordModel::new())),
        "ollama" => Ok(Arc::new(OllamaKeywordModel::new(
            Some(&config.ollama.url),
            Some(&config.ollama.model),
        ))),
        other => anyhow::bail!("Unknown keyword provider: {}", other),
    }
}
