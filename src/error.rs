//! Error types for the timer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TermdoroError {
    /// Ctrl-C was observed while a session or gate was in progress.
    #[error("timer interrupted")]
    Interrupted,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("could not read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TermdoroError>;
