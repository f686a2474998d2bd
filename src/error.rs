use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for hyperlaunch.
///
/// Stale search responses are deliberately absent: a response superseded by a
/// newer request is an expected outcome, discarded silently, never an error.
#[derive(Error, Debug)]
pub enum HyperlaunchError {
    #[error("search provider failed: {0}")]
    Provider(String),

    #[error("launch failed for '{path}': {message}")]
    Launch { path: String, message: String },

    #[error("termination request failed: {0}")]
    Termination(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to parse protocol message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HyperlaunchError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the flow should continue.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
