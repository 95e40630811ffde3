use std::path::PathBuf;
use thiserror::Error;

/// Failures the tagging pipeline distinguishes between.
///
/// Everything else travels as a plain `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("malformed document {}: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ExternalToolFailure {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to run {tool}: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no folder path provided")]
    MissingInput,

    #[error("unsupported file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("invalid sidecar {}: {source}", .path.display())]
    InvalidSidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TagError {
    /// Build an external tool failure from a finished process
    pub fn tool_failure(tool: &str, output: &std::process::Output) -> Self {
        Self::ExternalToolFailure {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Whether an error chain carries a malformed document failure
    pub fn is_malformed(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<TagError>(),
                Some(TagError::MalformedDocument { .. })
            )
        })
    }
}
