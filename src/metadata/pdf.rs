use crate::error::TagError;
use crate::metadata::MetadataStore;
use crate::models::{MediaKind, TagSet};
use crate::utils;
use anyhow::{Context, Result};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat};
use std::path::{Path, PathBuf};

/// Tags for PDF documents, kept in the document information `Keywords` field
pub struct PdfKeywordsStore;

impl PdfKeywordsStore {
    pub fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<Document> {
        let doc = Document::load(path).map_err(|e| TagError::MalformedDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(doc)
    }

    fn info_dict(doc: &Document) -> Option<&Dictionary> {
        match doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Read the `Keywords` entry of a loaded document
    pub(crate) fn keywords(doc: &Document) -> Option<String> {
        match Self::info_dict(doc)?.get(b"Keywords").ok()? {
            Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
            _ => None,
        }
    }

    /// Set the `Keywords` entry, creating the information dictionary if needed
    pub(crate) fn set_keywords(doc: &mut Document, keywords: &str) -> Result<()> {
        let value = encode_pdf_string(keywords);

        let info_ref = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| info.as_reference().ok());
        if let Some(id) = info_ref {
            doc.get_object_mut(id)?.as_dict_mut()?.set("Keywords", value);
            return Ok(());
        }

        let has_inline_info = matches!(doc.trailer.get(b"Info"), Ok(Object::Dictionary(_)));
        if has_inline_info {
            doc.trailer.get_mut(b"Info")?.as_dict_mut()?.set("Keywords", value);
        } else {
            let info_id = doc.add_object(dictionary! { "Keywords" => value });
            doc.trailer.set("Info", info_id);
        }
        Ok(())
    }

    fn read_blocking(path: &Path) -> Result<TagSet> {
        let doc = Self::load(path)?;
        Ok(Self::keywords(&doc)
            .map(|keywords| TagSet::parse_field(&keywords))
            .unwrap_or_default())
    }

    /// The whole document is re-serialized; it is saved next to the target
    /// and renamed over it once complete
    fn write_blocking(source: &Path, target: &Path, tags: &TagSet) -> Result<()> {
        let mut doc = Self::load(source)?;
        Self::set_keywords(&mut doc, &tags.to_field_string())?;

        let temp: PathBuf = utils::temp_sibling(target);
        if let Err(e) = doc.save(&temp) {
            let _ = std::fs::remove_file(&temp);
            return Err(e).with_context(|| format!("Failed to save PDF: {}", target.display()));
        }
        std::fs::rename(&temp, target)
            .with_context(|| format!("Failed to replace {}", target.display()))?;
        Ok(())
    }
}

impl Default for PdfKeywordsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8, or Latin-1
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// ASCII is written as a literal string, anything else as UTF-16BE with BOM
fn encode_pdf_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[async_trait::async_trait]
impl MetadataStore for PdfKeywordsStore {
    async fn read(&self, path: &Path) -> Result<TagSet> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_blocking(&path)).await?
    }

    async fn write_to(&self, source: &Path, target: &Path, tags: &TagSet) -> Result<()> {
        let source = source.to_path_buf();
        let target = target.to_path_buf();
        let tags = tags.clone();
        tokio::task::spawn_blocking({
            let target = target.clone();
            move || Self::write_blocking(&source, &target, &tags)
        })
        .await??;
        tracing::info!("Tagged PDF saved at: {}", target.display());
        Ok(())
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Pdf
    }
}
