use crate::keywords::{KeywordModel, ScoredKeyword};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Characters of content sent to the model
const MAX_PROMPT_CHARS: usize = 4000;

/// Keyword model backed by a local Ollama server
pub struct OllamaKeywordModel {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaKeywordModel {
    pub fn new(base_url: Option<&str>, model: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or("http://127.0.0.1:11434")
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or("llama3.2").to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_prompt(text: &str, top_n: usize) -> String {
        let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        format!(
            "Extract the {} most relevant single-word or short-phrase keywords from the text below. \
             Answer with JSON only, in the form {{\"keywords\": [{{\"term\": \"...\", \"score\": 0.0}}]}}, \
             scores between 0 and 1, most relevant first, terms in lowercase.\n\n{}",
            top_n, excerpt
        )
    }

    /// Parse the JSON document produced by the model
    pub(crate) fn parse_response(body: &str, top_n: usize) -> Result<Vec<ScoredKeyword>> {
        let parsed: KeywordList =
            serde_json::from_str(body.trim()).context("Ollama returned malformed keyword JSON")?;

        let mut keywords: Vec<ScoredKeyword> = parsed
            .keywords
            .into_iter()
            .map(|k| ScoredKeyword::new(k.term.trim().to_lowercase(), k.score))
            .filter(|k| !k.term.is_empty())
            .collect();
        // Stable sort keeps the model's own order for equal scores
        keywords.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        keywords.truncate(top_n);
        Ok(keywords)
    }
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct KeywordList {
    #[serde(default)]
    keywords: Vec<KeywordEntry>,
}

#[derive(Deserialize)]
struct KeywordEntry {
    term: String,
    #[serde(default)]
    score: f32,
}

#[async_trait::async_trait]
impl KeywordModel for OllamaKeywordModel {
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<ScoredKeyword>> {
        if text.trim().is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/generate", self.base_url);
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt: Self::build_prompt(text, top_n),
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama API returned error: {}", response.status());
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama generate response")?;

        Self::parse_response(&body.response, top_n)
    }
}
