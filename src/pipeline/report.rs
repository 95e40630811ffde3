use crate::models::{MediaKind, TagSet};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why a file ended without any write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extraction produced no usable tags
    NoTags,
    /// The user declined to overwrite an existing tagged copy
    Declined,
    /// Sync found nothing in the OS tag store
    NoOsTags,
    /// Sync only touches tagged files
    NotTagged,
    /// No extractor or store handles this kind
    Unsupported,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoTags => "no tags extracted",
            Self::Declined => "overwrite declined",
            Self::NoOsTags => "no OS tags",
            Self::NotTagged => "not tagged",
            Self::Unsupported => "unsupported",
        };
        f.write_str(reason)
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Fresh tags were generated and written to `target`
    Generated {
        target: PathBuf,
        tags: TagSet,
        os_tags_written: bool,
    },
    /// The file was already tagged; only OS tags were reconciled
    AlreadyTagged { tags: TagSet, os_tags_written: bool },
    /// Content metadata was overwritten with the OS tags
    Synced { tags: TagSet },
    /// Sync found both sides already equal
    Unchanged,
    Skipped(SkipReason),
    Failed { message: String, malformed: bool },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether this outcome changed anything on disk or in the OS store
    pub fn wrote(&self) -> bool {
        match self {
            Self::Generated { .. } | Self::Synced { .. } => true,
            Self::AlreadyTagged {
                os_tags_written, ..
            } => *os_tags_written,
            _ => false,
        }
    }
}

/// Outcomes of one pass over a directory
#[derive(Debug, Default)]
pub struct RunReport {
    pub entries: Vec<(PathBuf, FileOutcome)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.entries.push((path, outcome));
    }

    pub fn processed(&self) -> usize {
        self.entries.len()
    }

    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Generated { .. }))
    }

    pub fn already_tagged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::AlreadyTagged { .. }))
    }

    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Synced { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(FileOutcome::is_failure)
    }

    pub fn malformed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { malformed: true, .. }))
    }

    /// Number of files whose content metadata or OS tags were written
    pub fn writes(&self) -> usize {
        self.count(FileOutcome::wrote)
    }

    /// Outcome recorded for `path`, if any
    pub fn outcome(&self, path: &std::path::Path) -> Option<&FileOutcome> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} files: {} tagged, {} already tagged, {} synced, {} unchanged, {} skipped, {} failed",
            self.processed(),
            self.generated(),
            self.already_tagged(),
            self.synced(),
            self.unchanged(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Tags held on both sides for one file, as reported by `list`
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub content_tags: TagSet,
    pub os_tags: TagSet,
    pub in_sync: bool,
}

impl ListEntry {
    pub fn new(path: PathBuf, kind: MediaKind, content_tags: TagSet, os_tags: TagSet) -> Self {
        let in_sync = content_tags.same_tags(&os_tags);
        Self {
            path,
            kind,
            content_tags,
            os_tags,
            in_sync,
        }
    }
}
