pub mod ffmpeg;
pub mod r#trait;

pub use ffmpeg::Ffmpeg;
pub use r#trait::MediaTool;
