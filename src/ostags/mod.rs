pub mod r#trait;
pub mod tag_cli;

pub use r#trait::OsTagStore;
pub use tag_cli::TagCli;
