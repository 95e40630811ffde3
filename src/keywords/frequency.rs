use crate::keywords::{KeywordModel, ScoredKeyword};
use anyhow::Result;
use std::collections::HashMap;

/// Common English words that never make useful tags
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "even",
    "few", "for", "from", "further", "get", "got", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "like", "may", "me", "might", "more", "most", "much",
    "must", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "us", "very", "was", "we", "well", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "yes", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Built-in keyword model ranking terms by relative frequency.
///
/// Deterministic and offline: ties keep the order of first appearance.
pub struct FrequencyKeywordModel {
    min_length: usize,
}

impl FrequencyKeywordModel {
    pub fn new() -> Self {
        Self { min_length: 2 }
    }

    /// Ignore terms shorter than `min_length` characters
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    fn rank(&self, text: &str, top_n: usize) -> Vec<ScoredKeyword> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut total = 0usize;

        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
            .map(|w| w.trim_matches(|c: char| c == '\'' || c == '-').to_lowercase())
            .filter(|w| w.chars().count() >= self.min_length)
            .filter(|w| w.chars().any(char::is_alphabetic))
            .filter(|w| !STOPWORDS.contains(&w.as_str()));

        for (position, word) in words.enumerate() {
            total += 1;
            counts.entry(word).or_insert((0, position)).0 += 1;
        }

        if total == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(top_n)
            .map(|(term, count, _)| ScoredKeyword::new(term, count as f32 / total as f32))
            .collect()
    }
}

impl Default for FrequencyKeywordModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KeywordModel for FrequencyKeywordModel {
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<ScoredKeyword>> {
        Ok(self.rank(text, top_n))
    }
}
