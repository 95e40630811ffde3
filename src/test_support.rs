//! Fakes of the external collaborators and fixture builders shared by tests.

use crate::keywords::{KeywordModel, ScoredKeyword};
use crate::media::MediaTool;
use crate::models::{TagSet, Transcription};
use crate::ostags::OsTagStore;
use crate::transcriber::Transcriber;
use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a minimal PDF with one page per entry of `pages`
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Media tool keeping the comment field inside the file body (`comment=<value>`)
/// so it survives the rename done after a remux
#[derive(Default)]
pub struct FakeMediaTool {
    codec: Option<String>,
    extracted: Mutex<Vec<(PathBuf, PathBuf)>>,
    remuxed: Mutex<Vec<(PathBuf, PathBuf, String)>>,
}

impl FakeMediaTool {
    pub fn with_codec(codec: &str) -> Self {
        Self {
            codec: Some(codec.to_string()),
            ..Self::default()
        }
    }

    pub fn extracted(&self) -> Vec<(PathBuf, PathBuf)> {
        self.extracted.lock().unwrap().clone()
    }

    pub fn remuxed(&self) -> Vec<(PathBuf, PathBuf, String)> {
        self.remuxed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaTool for FakeMediaTool {
    async fn probe_audio_codec(&self, _video: &Path) -> Result<Option<String>> {
        Ok(self.codec.clone())
    }

    async fn probe_comment(&self, video: &Path) -> Result<Option<String>> {
        let body = std::fs::read_to_string(video)?;
        Ok(body
            .strip_prefix("comment=")
            .map(|c| c.to_string())
            .filter(|c| !c.is_empty()))
    }

    async fn extract_audio(&self, video: &Path, output: &Path) -> Result<()> {
        std::fs::write(output, b"audio")?;
        self.extracted
            .lock()
            .unwrap()
            .push((video.to_path_buf(), output.to_path_buf()));
        Ok(())
    }

    async fn remux_with_comment(&self, input: &Path, output: &Path, comment: &str) -> Result<()> {
        std::fs::write(output, format!("comment={}", comment))?;
        self.remuxed.lock().unwrap().push((
            input.to_path_buf(),
            output.to_path_buf(),
            comment.to_string(),
        ));
        Ok(())
    }
}

/// In-memory OS tag store recording every write
#[derive(Default)]
pub struct FakeTagStore {
    tags: Mutex<HashMap<PathBuf, TagSet>>,
    writes: Mutex<Vec<(PathBuf, TagSet)>>,
}

impl FakeTagStore {
    pub fn preset(&self, path: &Path, tags: &[&str]) {
        self.tags
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), tags.iter().copied().collect());
    }

    pub fn get(&self, path: &Path) -> TagSet {
        self.tags.lock().unwrap().get(path).cloned().unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<(PathBuf, TagSet)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OsTagStore for FakeTagStore {
    async fn list_tags(&self, path: &Path) -> Result<TagSet> {
        Ok(self.get(path))
    }

    async fn set_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        self.tags
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), tags.clone());
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), tags.clone()));
        Ok(())
    }
}

/// Transcriber returning a canned transcript
pub struct FakeTranscriber {
    language: String,
    transcript: String,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeTranscriber {
    pub fn new(language: &str, transcript: &str) -> Self {
        Self {
            language: language.to_string(),
            transcript: transcript.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Transcription> {
        self.calls.lock().unwrap().push(audio.to_path_buf());
        Ok(Transcription {
            language: self.language.clone(),
            transcript: self.transcript.clone(),
        })
    }
}

/// Keyword model counting its invocations
#[derive(Default)]
pub struct CountingModel {
    calls: Mutex<usize>,
}

impl CountingModel {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl KeywordModel for CountingModel {
    async fn extract_keywords(&self, text: &str, top_n: usize) -> Result<Vec<ScoredKeyword>> {
        *self.calls.lock().unwrap() += 1;
        crate::keywords::FrequencyKeywordModel::new()
            .extract_keywords(text, top_n)
            .await
    }
}
