pub mod engine;
pub mod report;
pub mod scanner;

pub use engine::{EngineOptions, NeverOverwrite, OverwritePrompt, Pass, TagEngine};
pub use report::{FileOutcome, ListEntry, RunReport, SkipReason};
