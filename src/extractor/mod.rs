pub mod pdf;
pub mod text;
pub mod r#trait;
pub mod video;

pub use pdf::PdfExtractor;
pub use r#trait::ContentExtractor;
pub use text::TextExtractor;
pub use video::VideoExtractor;

use crate::models::MediaKind;
use std::sync::Arc;

/// Registry mapping each media kind to its extractor
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register a new extractor; earlier registrations win
    pub fn register(&mut self, extractor: Arc<dyn ContentExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn with(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.register(extractor);
        self
    }

    /// Find the extractor handling `kind`
    pub fn get(&self, kind: MediaKind) -> Option<Arc<dyn ContentExtractor>> {
        self.extractors
            .iter()
            .find(|extractor| extractor.supports(kind))
            .cloned()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
