pub mod r#trait;
pub mod whisper;

pub use r#trait::Transcriber;
pub use whisper::WhisperCli;
