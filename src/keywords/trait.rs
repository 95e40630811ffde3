use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A candidate keyword with the model's relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub term: String,
    pub score: f32,
}

impl ScoredKeyword {
    pub fn new<S: Into<String>>(term: S, score: f32) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// Trait for keyword extraction models.
///
/// Implementations return at most `top_n` candidates, best first. One instance
/// is loaded per run and shared by every file.
#[async_trait::async_trait]
pub trait KeywordModel: Send + Sync {
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<ScoredKeyword>>;
}

/// Maps a plural noun to its singular form
pub trait Singularizer: Send + Sync {
    /// Returns `None` when the word is not a recognised plural
    fn singularize(&self, word: &str) -> Option<String>;
}
