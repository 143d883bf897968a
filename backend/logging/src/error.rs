use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Everything a logging call can fail with.
///
/// `NotInitialized`, `InvalidLevel` and `Config` are programmer errors: the
/// call site logged before bootstrap, passed a level that means nothing, or
/// bound an unusable config. Only `SinkWrite` reflects the environment.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("logger used before initialization")]
    NotInitialized,

    #[error("invalid level \"{0}\" passed to logger")]
    InvalidLevel(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("severity {0} is not in the level table")]
    UnknownSeverity(u16),

    #[error("failed to write log file {path}: {source}")]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    pub(crate) fn sink(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::SinkWrite {
            path: path.into(),
            source,
        }
    }

    /// True for the misuse cases that should abort loudly.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            LogError::NotInitialized | LogError::InvalidLevel(_) | LogError::Config(_)
        )
    }
}
