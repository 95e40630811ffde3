pub mod pdf;
pub mod sidecar;
pub mod r#trait;
pub mod video;

pub use pdf::PdfKeywordsStore;
pub use r#trait::MetadataStore;
pub use sidecar::SidecarStore;
pub use video::VideoCommentStore;

use crate::models::MediaKind;
use std::sync::Arc;

/// Registry mapping each media kind to the store holding its tags
pub struct MetadataRegistry {
    stores: Vec<Arc<dyn MetadataStore>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self { stores: Vec::new() }
    }

    /// Register a new store; earlier registrations win
    pub fn register(&mut self, store: Arc<dyn MetadataStore>) {
        self.stores.push(store);
    }

    pub fn with(mut self, store: Arc<dyn MetadataStore>) -> Self {
        self.register(store);
        self
    }

    /// Find the store handling `kind`
    pub fn get(&self, kind: MediaKind) -> Option<Arc<dyn MetadataStore>> {
        self.stores.iter().find(|store| store.supports(kind)).cloned()
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}
