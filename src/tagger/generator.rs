use crate::keywords::{KeywordModel, Singularizer};
use crate::models::TagSet;
use anyhow::Result;
use std::sync::Arc;

/// Turns raw text into a small ranked set of singular keyword tags.
///
/// The keyword model and singularizer are injected so the same generator can
/// run against a real model or a fake in tests.
pub struct TagGenerator {
    model: Arc<dyn KeywordModel>,
    singularizer: Arc<dyn Singularizer>,
    over_fetch: usize,
}

impl TagGenerator {
    pub fn new(model: Arc<dyn KeywordModel>, singularizer: Arc<dyn Singularizer>) -> Self {
        Self {
            model,
            singularizer,
            over_fetch: crate::constants::DEFAULT_OVER_FETCH,
        }
    }

    /// Candidate multiplier used to make up for collapsed plurals
    pub fn with_over_fetch(mut self, over_fetch: usize) -> Self {
        self.over_fetch = over_fetch.max(1);
        self
    }

    /// Generate at most `top_n` unique tags for `text`.
    ///
    /// Candidates are taken in model order, lowercased and singularized; a
    /// candidate whose normalized form was already accepted is dropped.
    pub async fn generate(&self, text: &str, top_n: usize) -> Result<TagSet> {
        let mut tags = TagSet::new();
        if text.trim().is_empty() || top_n == 0 {
            return Ok(tags);
        }

        let candidates = self
            .model
            .extract_keywords(text, top_n.saturating_mul(self.over_fetch))
            .await?;

        for candidate in candidates {
            if tags.len() >= top_n {
                break;
            }
            let term = candidate.term.trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            let normalized = self.singularizer.singularize(&term).unwrap_or(term);
            tags.insert(normalized);
        }

        Ok(tags)
    }

    /// Singularize and deduplicate tags that come from another store
    pub fn normalize(&self, tags: &TagSet) -> TagSet {
        tags.iter()
            .map(|tag| {
                self.singularizer
                    .singularize(tag)
                    .unwrap_or_else(|| tag.clone())
            })
            .collect()
    }
}
