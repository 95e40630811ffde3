use crate::error::TagError;
use crate::extractor::ContentExtractor;
use crate::models::{MediaFile, MediaKind};
use anyhow::Result;
use std::path::Path;

/// PDF text extractor.
///
/// Pages are read with lopdf in page order; when lopdf finds no text layer the
/// whole document is retried with pdf-extract.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(path: &Path) -> Result<String> {
        let doc = lopdf::Document::load(path).map_err(|e| TagError::MalformedDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut text_content = String::new();
        // get_pages is keyed by page number, so iteration follows page order
        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    text_content.push_str(&page_text);
                    text_content.push('\n');
                }
                Err(e) => {
                    tracing::debug!("No text on page {} of {}: {}", page_num, path.display(), e)
                }
            }
        }

        if !text_content.trim().is_empty() {
            return Ok(text_content);
        }

        match pdf_extract::extract_text(path) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::debug!("pdf-extract found no text in {}: {}", path.display(), e);
                Ok(String::new())
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContentExtractor for PdfExtractor {
    async fn extract(&self, file: &MediaFile) -> Result<String> {
        let path = file.path.clone();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&path)).await?
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Pdf
    }
}
