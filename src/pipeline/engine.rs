use crate::config::{Config, MarkerStrategy, OutputMode, TaggingConfig};
use crate::error::TagError;
use crate::extractor::{ExtractorRegistry, PdfExtractor, TextExtractor, VideoExtractor};
use crate::keywords::{self, EnglishInflector};
use crate::media::{Ffmpeg, MediaTool};
use crate::metadata::{
    MetadataRegistry, MetadataStore, PdfKeywordsStore, SidecarStore, VideoCommentStore,
};
use crate::models::{MediaFile, TagSet};
use crate::ostags::{OsTagStore, TagCli};
use crate::pipeline::report::{FileOutcome, ListEntry, RunReport, SkipReason};
use crate::pipeline::scanner;
use crate::tagger::TagGenerator;
use crate::transcriber::{Transcriber, WhisperCli};
use crate::utils;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Asked before an existing tagged copy is replaced
pub trait OverwritePrompt: Send + Sync {
    fn confirm_overwrite(&self, path: &Path) -> Result<bool>;
}

/// Declines every overwrite; used when nobody can answer
pub struct NeverOverwrite;

impl OverwritePrompt for NeverOverwrite {
    fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        tracing::info!("Not overwriting existing file: {}", path.display());
        Ok(false)
    }
}

/// Which direction a pass reconciles in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Generate missing content tags and copy them to the OS store
    Tag,
    /// Copy OS tags into content metadata
    Sync,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub top_n: usize,
    pub marker: MarkerStrategy,
    pub output: OutputMode,
    pub assume_yes: bool,
}

impl EngineOptions {
    pub fn from_config(tagging: &TaggingConfig) -> Self {
        Self {
            top_n: tagging.top_n,
            marker: tagging.marker,
            output: tagging.output,
            assume_yes: tagging.assume_yes,
        }
    }

    /// The suffix marker can only recognise files written as tagged copies
    fn effective_output(&self) -> OutputMode {
        match self.marker {
            MarkerStrategy::Suffix => OutputMode::TaggedCopy,
            MarkerStrategy::Metadata => self.output,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&TaggingConfig::default())
    }
}

/// What is known about a file before acting on it
struct Inspection {
    tagged: bool,
    content: Option<TagSet>,
    os: Option<TagSet>,
}

/// Per-file state machine behind `run`, `sync` and `list`.
///
/// Files are handled strictly one after another; a failure is logged, recorded
/// in the report and the next file is processed.
pub struct TagEngine {
    extractors: ExtractorRegistry,
    stores: MetadataRegistry,
    os_tags: Arc<dyn OsTagStore>,
    generator: TagGenerator,
    options: EngineOptions,
    prompt: Arc<dyn OverwritePrompt>,
}

impl TagEngine {
    pub fn new(
        extractors: ExtractorRegistry,
        stores: MetadataRegistry,
        os_tags: Arc<dyn OsTagStore>,
        generator: TagGenerator,
        options: EngineOptions,
    ) -> Self {
        Self {
            extractors,
            stores,
            os_tags,
            generator,
            options,
            prompt: Arc::new(NeverOverwrite),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn OverwritePrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Wire the engine to the external tools named in the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let media: Arc<dyn MediaTool> = Arc::new(
            Ffmpeg::new().with_executables(config.tools.ffmpeg.as_str(), config.tools.ffprobe.as_str()),
        );
        let transcriber: Arc<dyn Transcriber> = Arc::new(
            WhisperCli::new(config.tools.whisper_model.as_str())
                .with_executable(config.tools.whisper.as_str()),
        );
        let os_tags: Arc<dyn OsTagStore> =
            Arc::new(TagCli::new().with_executable(config.tools.tag.as_str()));

        let extractors = ExtractorRegistry::new()
            .with(Arc::new(PdfExtractor::new()))
            .with(Arc::new(TextExtractor::new()))
            .with(Arc::new(VideoExtractor::new(media.clone(), transcriber)));
        let stores = MetadataRegistry::new()
            .with(Arc::new(PdfKeywordsStore::new()))
            .with(Arc::new(SidecarStore::new()))
            .with(Arc::new(VideoCommentStore::new(media)));

        let model = keywords::model_from_config(config)?;
        let generator = TagGenerator::new(model, Arc::new(EnglishInflector::new()))
            .with_over_fetch(config.tagging.over_fetch);

        Ok(Self::new(
            extractors,
            stores,
            os_tags,
            generator,
            EngineOptions::from_config(&config.tagging),
        ))
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn store_for(&self, file: &MediaFile) -> Result<Arc<dyn MetadataStore>> {
        self.stores
            .get(file.kind)
            .ok_or_else(|| TagError::UnsupportedFile(file.path.clone()).into())
    }

    async fn inspect(&self, file: &MediaFile, store: &dyn MetadataStore) -> Result<Inspection> {
        let mut inspection = match self.options.marker {
            MarkerStrategy::Suffix if utils::has_tagged_suffix(&file.path) => Inspection {
                tagged: true,
                content: None,
                os: None,
            },
            // Sidecar stores never produce a `_tagged` copy, so their own record is the marker
            MarkerStrategy::Suffix if !store.supports_copy() => {
                let content = store.read(&file.path).await?;
                Inspection {
                    tagged: !content.is_empty(),
                    content: Some(content),
                    os: None,
                }
            }
            MarkerStrategy::Suffix => Inspection {
                tagged: false,
                content: None,
                os: None,
            },
            MarkerStrategy::Metadata => {
                let content = store.read(&file.path).await?;
                let os = self.os_tags.list_tags(&file.path).await?;
                Inspection {
                    tagged: !content.is_empty() || !os.is_empty(),
                    content: Some(content),
                    os: Some(os),
                }
            }
        };

        if !inspection.tagged && self.has_tagged_copy(file, store).await? {
            tracing::debug!("Tagged copy already exists for {}", file.path.display());
            inspection.tagged = true;
        }
        Ok(inspection)
    }

    /// Whether a `_tagged` sibling holding tags was already written for `file`
    async fn has_tagged_copy(&self, file: &MediaFile, store: &dyn MetadataStore) -> Result<bool> {
        if self.options.effective_output() != OutputMode::TaggedCopy || !store.supports_copy() {
            return Ok(false);
        }
        let copy = utils::tagged_copy_path(&file.path);
        if !copy.exists() {
            return Ok(false);
        }
        Ok(!store.read(&copy).await?.is_empty())
    }

    /// Whether `file` already carries the configured tagged marker
    pub async fn detect_tagged(&self, file: &MediaFile) -> Result<bool> {
        let store = self.store_for(file)?;
        Ok(self.inspect(file, store.as_ref()).await?.tagged)
    }

    fn failure(&self, file: &MediaFile, err: anyhow::Error) -> FileOutcome {
        if let Some(TagError::UnsupportedFile(_)) = err.downcast_ref::<TagError>() {
            tracing::debug!("Skipped file: {}", file.path.display());
            return FileOutcome::Skipped(SkipReason::Unsupported);
        }

        let malformed = TagError::is_malformed(&err);
        if malformed {
            tracing::error!("Error processing PDF {}: {:#}", file.path.display(), err);
        } else {
            tracing::error!("Error processing {}: {:#}", file.path.display(), err);
        }
        FileOutcome::Failed {
            message: format!("{:#}", err),
            malformed,
        }
    }

    /// Run the tag pass on one file; errors end in `FileOutcome::Failed`
    pub async fn tag_file(&self, file: &MediaFile) -> FileOutcome {
        match self.try_tag_file(file).await {
            Ok(outcome) => outcome,
            Err(e) => self.failure(file, e),
        }
    }

    async fn try_tag_file(&self, file: &MediaFile) -> Result<FileOutcome> {
        let store = self.store_for(file)?;
        let inspection = self.inspect(file, store.as_ref()).await?;
        let file = file.clone().with_tagged(inspection.tagged);

        if file.tagged {
            let content = match inspection.content {
                Some(content) => content,
                None => store.read(&file.path).await?,
            };
            let tags = self.generator.normalize(&content);
            tracing::info!("Already tagged: {}", file.path.display());
            let os_tags_written = self.reconcile_os_tags(&file.path, &tags, inspection.os).await?;
            return Ok(FileOutcome::AlreadyTagged {
                tags,
                os_tags_written,
            });
        }

        let extractor = self
            .extractors
            .get(file.kind)
            .ok_or_else(|| TagError::UnsupportedFile(file.path.clone()))?;
        tracing::info!("Processing {}: {}", file.kind, file.path.display());
        let text = extractor
            .extract(&file)
            .await
            .with_context(|| format!("Failed to extract content from {}", file.path.display()))?;

        let tags = self.generator.generate(&text, self.options.top_n).await?;
        if tags.is_empty() {
            tracing::info!("No tags extracted from {}", file.path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NoTags));
        }

        let target = self.output_target(&file, store.as_ref());
        if target != file.path && target.exists() && !self.confirm_overwrite(&target)? {
            return Ok(FileOutcome::Skipped(SkipReason::Declined));
        }

        store
            .write_to(&file.path, &target, &tags)
            .await
            .with_context(|| format!("Failed to write tags to {}", target.display()))?;
        tracing::info!("Tags for {}: {}", target.display(), tags);

        let known_os = if target == file.path { inspection.os } else { None };
        let os_tags_written = self.reconcile_os_tags(&target, &tags, known_os).await?;
        Ok(FileOutcome::Generated {
            target,
            tags,
            os_tags_written,
        })
    }

    fn output_target(&self, file: &MediaFile, store: &dyn MetadataStore) -> PathBuf {
        match self.options.effective_output() {
            OutputMode::TaggedCopy if store.supports_copy() => utils::tagged_copy_path(&file.path),
            _ => file.path.clone(),
        }
    }

    fn confirm_overwrite(&self, target: &Path) -> Result<bool> {
        if self.options.assume_yes {
            return Ok(true);
        }
        self.prompt.confirm_overwrite(target)
    }

    /// Copy content tags to the OS store when it holds none.
    ///
    /// Returns whether a write happened; existing OS tags are never replaced.
    async fn reconcile_os_tags(
        &self,
        path: &Path,
        content: &TagSet,
        known: Option<TagSet>,
    ) -> Result<bool> {
        if content.is_empty() {
            return Ok(false);
        }
        let current = match known {
            Some(current) => current,
            None => self.os_tags.list_tags(path).await?,
        };
        if !current.is_empty() {
            tracing::debug!("OS tags already present on {}: {}", path.display(), current);
            return Ok(false);
        }

        self.os_tags.set_tags(path, content).await?;
        tracing::info!("OS tags set on {}: {}", path.display(), content);
        Ok(true)
    }

    /// Run the sync pass on one file; errors end in `FileOutcome::Failed`
    pub async fn sync_file(&self, file: &MediaFile) -> FileOutcome {
        match self.try_sync_file(file).await {
            Ok(outcome) => outcome,
            Err(e) => self.failure(file, e),
        }
    }

    async fn try_sync_file(&self, file: &MediaFile) -> Result<FileOutcome> {
        let store = self.store_for(file)?;
        let inspection = self.inspect(file, store.as_ref()).await?;
        if !inspection.tagged {
            tracing::debug!("Not tagged, skipping sync: {}", file.path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NotTagged));
        }

        let os = match inspection.os {
            Some(os) => os,
            None => self.os_tags.list_tags(&file.path).await?,
        };
        if os.is_empty() {
            tracing::info!("No tags found for {}", file.path.display());
            return Ok(FileOutcome::Skipped(SkipReason::NoOsTags));
        }
        let os = self.generator.normalize(&os);

        let content = match inspection.content {
            Some(content) => content,
            None => store.read(&file.path).await?,
        };
        if os.same_tags(&content) {
            tracing::debug!("Tags already in sync: {}", file.path.display());
            return Ok(FileOutcome::Unchanged);
        }
        if !content.is_empty() {
            tracing::warn!(
                "Overwriting content tags [{}] of {} with OS tags [{}]",
                content,
                file.path.display(),
                os
            );
        }

        store
            .write(&file.path, &os)
            .await
            .with_context(|| format!("Failed to write tags to {}", file.path.display()))?;
        tracing::info!("Synced tags for {}: {}", file.path.display(), os);
        Ok(FileOutcome::Synced { tags: os })
    }

    /// Both tag sets currently held for `file`
    pub async fn list_file(&self, file: &MediaFile) -> Result<ListEntry> {
        let store = self.store_for(file)?;
        let content = store.read(&file.path).await?;
        let os = self.os_tags.list_tags(&file.path).await?;
        Ok(ListEntry::new(file.path.clone(), file.kind, content, os))
    }

    /// Process `files` in order, calling `on_done` after each one
    pub async fn run_pass<F>(&self, pass: Pass, files: &[MediaFile], mut on_done: F) -> RunReport
    where
        F: FnMut(&MediaFile, &FileOutcome),
    {
        let mut report = RunReport::new();
        for file in files {
            let outcome = match pass {
                Pass::Tag => self.tag_file(file).await,
                Pass::Sync => self.sync_file(file).await,
            };
            on_done(file, &outcome);
            report.record(file.path.clone(), outcome);
        }
        report
    }

    /// Tag every supported file under `root`
    pub async fn run_tag(&self, root: &Path) -> Result<RunReport> {
        let files = scanner::discover(root)?;
        Ok(self.run_pass(Pass::Tag, &files, |_, _| {}).await)
    }

    /// Copy OS tags into the content metadata of every tagged file under `root`
    pub async fn run_sync(&self, root: &Path) -> Result<RunReport> {
        let files = scanner::discover(root)?;
        Ok(self.run_pass(Pass::Sync, &files, |_, _| {}).await)
    }

    /// Collect the tags of every supported file under `root`
    pub async fn run_list(&self, root: &Path) -> Result<Vec<ListEntry>> {
        let files = scanner::discover(root)?;
        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            match self.list_file(file).await {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    self.failure(file, e);
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use crate::test_support::{
        write_pdf, CountingModel, FakeMediaTool, FakeTagStore, FakeTranscriber,
    };
    use std::fs;
    use tempfile::TempDir;

    struct AlwaysOverwrite;

    impl OverwritePrompt for AlwaysOverwrite {
        fn confirm_overwrite(&self, _path: &Path) -> Result<bool> {
            Ok(true)
        }
    }

    struct Harness {
        engine: TagEngine,
        model: Arc<CountingModel>,
        os_tags: Arc<FakeTagStore>,
        media: Arc<FakeMediaTool>,
        transcriber: Arc<FakeTranscriber>,
    }

    fn harness(options: EngineOptions) -> Harness {
        let model = Arc::new(CountingModel::default());
        let os_tags = Arc::new(FakeTagStore::default());
        let media = Arc::new(FakeMediaTool::with_codec("aac"));
        let transcriber = Arc::new(FakeTranscriber::new(
            "en",
            "Rust lectures cover ownership. Ownership rules and borrowing rules.",
        ));

        let extractors = ExtractorRegistry::new()
            .with(Arc::new(PdfExtractor::new()))
            .with(Arc::new(TextExtractor::new()))
            .with(Arc::new(VideoExtractor::new(media.clone(), transcriber.clone())));
        let stores = MetadataRegistry::new()
            .with(Arc::new(PdfKeywordsStore::new()))
            .with(Arc::new(SidecarStore::new()))
            .with(Arc::new(VideoCommentStore::new(media.clone())));
        let generator = TagGenerator::new(model.clone(), Arc::new(EnglishInflector::new()));

        Harness {
            engine: TagEngine::new(extractors, stores, os_tags.clone(), generator, options),
            model,
            os_tags,
            media,
            transcriber,
        }
    }

    fn tags(items: &[&str]) -> TagSet {
        items.iter().copied().collect()
    }

    fn read_sidecar(path: &Path) -> Vec<String> {
        let raw = fs::read_to_string(utils::sidecar_path(path)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_text_file_gets_sidecar_and_os_tags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "cats run fast, dogs run faster").unwrap();
        let h = harness(EngineOptions::default());

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.generated(), 1);
        let written = read_sidecar(&path);
        assert_eq!(written, vec!["run", "cat", "fast", "dog", "faster"]);
        assert!(written.len() <= 5);
        assert!(!written.iter().any(|t| t == "cats" || t == "dogs"));
        assert_eq!(h.os_tags.get(&path).into_vec(), written);
        assert_eq!(h.os_tags.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "cats run fast, dogs run faster").unwrap();
        let h = harness(EngineOptions::default());

        h.engine.run_tag(temp_dir.path()).await.unwrap();
        let sidecar_before = fs::read_to_string(utils::sidecar_path(&path)).unwrap();
        let modified_before = fs::metadata(utils::sidecar_path(&path))
            .unwrap()
            .modified()
            .unwrap();

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.already_tagged(), 1);
        assert_eq!(report.writes(), 0);
        assert_eq!(h.model.calls(), 1);
        assert_eq!(h.os_tags.writes().len(), 1);
        let sidecar_path = utils::sidecar_path(&path);
        assert_eq!(fs::read_to_string(&sidecar_path).unwrap(), sidecar_before);
        assert_eq!(fs::metadata(&sidecar_path).unwrap().modified().unwrap(), modified_before);
    }

    #[tokio::test]
    async fn test_existing_os_tags_are_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "cats run fast").unwrap();
        fs::write(utils::sidecar_path(&path), r#"{"tags":["cat","run"]}"#).unwrap();
        let h = harness(EngineOptions::default());
        h.os_tags.preset(&path, &["Work"]);

        let outcome = h.engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert_eq!(
            outcome,
            FileOutcome::AlreadyTagged {
                tags: tags(&["cat", "run"]),
                os_tags_written: false
            }
        );
        assert_eq!(h.os_tags.get(&path), tags(&["Work"]));
        assert!(h.os_tags.writes().is_empty());
        assert_eq!(h.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_tagged_file_without_os_tags_is_reconciled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "irrelevant").unwrap();
        fs::write(utils::sidecar_path(&path), r#"{"tags":["invoice","receipts"]}"#).unwrap();
        let h = harness(EngineOptions::default());

        let outcome = h.engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert!(matches!(
            outcome,
            FileOutcome::AlreadyTagged {
                os_tags_written: true,
                ..
            }
        ));
        assert_eq!(h.os_tags.get(&path), tags(&["invoice", "receipt"]));
        assert_eq!(h.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.txt");
        fs::write(&path, "   \n").unwrap();
        let h = harness(EngineOptions::default());

        let outcome = h.engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::NoTags));
        assert!(!utils::sidecar_path(&path).exists());
        assert!(h.os_tags.writes().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_does_not_stop_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let broken = temp_dir.path().join("broken.pdf");
        let notes = temp_dir.path().join("notes.txt");
        fs::write(&broken, b"this is not a pdf").unwrap();
        fs::write(&notes, "cats run fast, dogs run faster").unwrap();
        let h = harness(EngineOptions::default());

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.processed(), 2);
        assert_eq!(report.malformed(), 1);
        assert!(matches!(
            report.outcome(&broken),
            Some(FileOutcome::Failed { malformed: true, .. })
        ));
        assert!(matches!(report.outcome(&notes), Some(FileOutcome::Generated { .. })));
        assert!(utils::sidecar_path(&notes).exists());
    }

    #[tokio::test]
    async fn test_pdf_tagged_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("invoice.pdf");
        write_pdf(&path, &["Invoice invoices total", "Invoice payment"]);
        let h = harness(EngineOptions::default());

        let outcome = h.engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Pdf)).await;

        let written = match outcome {
            FileOutcome::Generated { target, tags, .. } => {
                assert_eq!(target, path);
                tags
            }
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert!(written.contains("invoice"));
        assert!(!written.contains("invoices"));
        assert_eq!(PdfKeywordsStore::new().read(&path).await.unwrap(), written);
        assert_eq!(h.os_tags.get(&path), written);
    }

    #[tokio::test]
    async fn test_tagged_copy_mode_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        let copy = temp_dir.path().join("report_tagged.pdf");
        write_pdf(&path, &["Quarterly report revenue report"]);
        let options = EngineOptions {
            output: OutputMode::TaggedCopy,
            ..EngineOptions::default()
        };
        let h = harness(options);

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.generated(), 1);
        assert!(PdfKeywordsStore::new().read(&path).await.unwrap().is_empty());
        let copy_tags = PdfKeywordsStore::new().read(&copy).await.unwrap();
        assert!(copy_tags.contains("report"));
        assert_eq!(h.os_tags.get(&copy), copy_tags);
        assert!(h.os_tags.get(&path).is_empty());
    }

    #[tokio::test]
    async fn test_existing_tagged_copy_is_not_overwritten_when_declined() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        let copy = temp_dir.path().join("report_tagged.pdf");
        write_pdf(&path, &["Quarterly report revenue report"]);
        write_pdf(&copy, &["Older copy"]);
        let options = EngineOptions {
            output: OutputMode::TaggedCopy,
            ..EngineOptions::default()
        };
        let h = harness(options);

        let outcome = h.engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Pdf)).await;

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::Declined));
        assert!(PdfKeywordsStore::new().read(&copy).await.unwrap().is_empty());
        assert!(h.os_tags.writes().is_empty());
    }

    #[tokio::test]
    async fn test_existing_tagged_copy_is_overwritten_when_confirmed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        let copy = temp_dir.path().join("report_tagged.pdf");
        write_pdf(&path, &["Quarterly report revenue report"]);
        write_pdf(&copy, &["Older copy"]);
        let options = EngineOptions {
            output: OutputMode::TaggedCopy,
            ..EngineOptions::default()
        };
        let h = harness(options);
        let engine = h.engine.with_prompt(Arc::new(AlwaysOverwrite));

        let outcome = engine.tag_file(&MediaFile::new(path.clone(), MediaKind::Pdf)).await;

        assert!(matches!(outcome, FileOutcome::Generated { .. }));
        assert!(PdfKeywordsStore::new().read(&copy).await.unwrap().contains("report"));
    }

    #[tokio::test]
    async fn test_suffix_marker_treats_tagged_stem_as_tagged() {
        let temp_dir = TempDir::new().unwrap();
        let tagged = temp_dir.path().join("notes_tagged.txt");
        fs::write(&tagged, "cats run fast").unwrap();
        let options = EngineOptions {
            marker: MarkerStrategy::Suffix,
            ..EngineOptions::default()
        };
        let h = harness(options);

        let file = MediaFile::new(tagged.clone(), MediaKind::Text);
        assert!(h.engine.detect_tagged(&file).await.unwrap());
        let outcome = h.engine.tag_file(&file).await;

        assert_eq!(
            outcome,
            FileOutcome::AlreadyTagged {
                tags: TagSet::new(),
                os_tags_written: false
            }
        );
        assert_eq!(h.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_suffix_marker_second_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let notes = temp_dir.path().join("notes.txt");
        let report_pdf = temp_dir.path().join("report.pdf");
        fs::write(&notes, "cats run fast, dogs run faster").unwrap();
        write_pdf(&report_pdf, &["Quarterly report revenue report"]);
        let options = EngineOptions {
            marker: MarkerStrategy::Suffix,
            assume_yes: true,
            ..EngineOptions::default()
        };
        let h = harness(options);

        let first = h.engine.run_tag(temp_dir.path()).await.unwrap();
        assert_eq!(first.generated(), 2);
        assert!(temp_dir.path().join("report_tagged.pdf").exists());
        let sidecar_before = fs::read_to_string(utils::sidecar_path(&notes)).unwrap();
        let os_writes_before = h.os_tags.writes().len();

        let second = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(second.generated(), 0);
        assert_eq!(second.writes(), 0);
        assert_eq!(h.model.calls(), 2);
        assert_eq!(h.os_tags.writes().len(), os_writes_before);
        assert_eq!(fs::read_to_string(utils::sidecar_path(&notes)).unwrap(), sidecar_before);
    }

    #[tokio::test]
    async fn test_tagged_copy_second_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        let copy = temp_dir.path().join("report_tagged.pdf");
        write_pdf(&path, &["Quarterly report revenue report"]);
        let options = EngineOptions {
            output: OutputMode::TaggedCopy,
            assume_yes: true,
            ..EngineOptions::default()
        };
        let h = harness(options);

        h.engine.run_tag(temp_dir.path()).await.unwrap();
        let copy_before = fs::read(&copy).unwrap();

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.processed(), 2);
        assert_eq!(report.generated(), 0);
        assert_eq!(report.writes(), 0);
        assert!(matches!(report.outcome(&path), Some(FileOutcome::AlreadyTagged { .. })));
        assert_eq!(h.model.calls(), 1);
        assert_eq!(h.os_tags.writes().len(), 1);
        assert_eq!(fs::read(&copy).unwrap(), copy_before);
    }

    #[tokio::test]
    async fn test_video_reuses_existing_audio() {
        let temp_dir = TempDir::new().unwrap();
        let video = temp_dir.path().join("lecture.mp4");
        fs::write(&video, b"").unwrap();
        let audio = utils::audio_path(&video, "aac");
        fs::create_dir_all(audio.parent().unwrap()).unwrap();
        fs::write(&audio, b"existing audio").unwrap();
        let h = harness(EngineOptions::default());

        let report = h.engine.run_tag(temp_dir.path()).await.unwrap();

        assert_eq!(report.generated(), 1);
        assert!(h.media.extracted().is_empty());
        assert_eq!(h.transcriber.calls(), vec![audio.clone()]);
        assert!(utils::transcription_path(&audio).exists());
        let comment_tags = VideoCommentStore::new(h.media.clone()).read(&video).await.unwrap();
        assert!(comment_tags.contains("ownership"));
        assert!(comment_tags.contains("rule"));
        assert_eq!(h.os_tags.get(&video), comment_tags);
        assert!(!utils::temp_sibling(&video).exists());
    }

    #[tokio::test]
    async fn test_sync_copies_os_tags_into_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();
        fs::write(utils::sidecar_path(&path), r#"{"tags":["cat"]}"#).unwrap();
        let h = harness(EngineOptions::default());
        h.os_tags.preset(&path, &["dogs", "work"]);

        let report = h.engine.run_sync(temp_dir.path()).await.unwrap();

        assert_eq!(report.synced(), 1);
        assert_eq!(read_sidecar(&path), vec!["dog", "work"]);
        assert!(h.os_tags.writes().is_empty());
    }

    #[tokio::test]
    async fn test_sync_equal_sets_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();
        let raw = r#"{"tags":["cat","dog"]}"#;
        fs::write(utils::sidecar_path(&path), raw).unwrap();
        let h = harness(EngineOptions::default());
        h.os_tags.preset(&path, &["dog", "cat"]);

        let outcome = h.engine.sync_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert_eq!(outcome, FileOutcome::Unchanged);
        assert_eq!(fs::read_to_string(utils::sidecar_path(&path)).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_sync_without_os_tags_keeps_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();
        fs::write(utils::sidecar_path(&path), r#"{"tags":["cat"]}"#).unwrap();
        let h = harness(EngineOptions::default());

        let outcome = h.engine.sync_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::NoOsTags));
        assert_eq!(read_sidecar(&path), vec!["cat"]);
    }

    #[tokio::test]
    async fn test_sync_skips_untagged_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();
        let h = harness(EngineOptions::default());

        let outcome = h.engine.sync_file(&MediaFile::new(path.clone(), MediaKind::Text)).await;

        assert_eq!(outcome, FileOutcome::Skipped(SkipReason::NotTagged));
        assert!(!utils::sidecar_path(&path).exists());
    }

    #[tokio::test]
    async fn test_list_reports_both_sides() {
        let temp_dir = TempDir::new().unwrap();
        let notes = temp_dir.path().join("notes.txt");
        let other = temp_dir.path().join("other.txt");
        fs::write(&notes, "text").unwrap();
        fs::write(&other, "text").unwrap();
        fs::write(utils::sidecar_path(&notes), r#"{"tags":["cat"]}"#).unwrap();
        let h = harness(EngineOptions::default());
        h.os_tags.preset(&notes, &["cat"]);
        h.os_tags.preset(&other, &["dog"]);

        let entries = h.engine.run_list(temp_dir.path()).await.unwrap();

        assert_eq!(entries.len(), 2);
        let notes_entry = entries.iter().find(|e| e.path == notes).unwrap();
        assert!(notes_entry.in_sync);
        let other_entry = entries.iter().find(|e| e.path == other).unwrap();
        assert!(!other_entry.in_sync);
        assert!(other_entry.content_tags.is_empty());
        assert_eq!(other_entry.os_tags, tags(&["dog"]));
    }

    #[tokio::test]
    async fn test_run_rejects_missing_directory() {
        let h = harness(EngineOptions::default());
        assert!(h.engine.run_tag(Path::new("/nonexistent/mediatag")).await.is_err());
    }

    #[test]
    fn test_engine_from_default_config() {
        let engine = TagEngine::from_config(&Config::default()).unwrap();
        assert_eq!(engine.options().top_n, 5);
        assert_eq!(engine.options().marker, MarkerStrategy::Metadata);
    }
}
