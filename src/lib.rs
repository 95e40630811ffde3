pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod keywords;
pub mod media;
pub mod metadata;
pub mod models;
pub mod ostags;
pub mod pipeline;
pub mod tagger;
pub mod transcriber;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::TagError;
pub use extractor::ContentExtractor;
pub use keywords::{KeywordModel, Singularizer};
pub use media::MediaTool;
pub use metadata::MetadataStore;
pub use models::{MediaFile, MediaKind, TagSet};
pub use ostags::OsTagStore;
pub use pipeline::TagEngine;
pub use tagger::TagGenerator;
pub use transcriber::Transcriber;
