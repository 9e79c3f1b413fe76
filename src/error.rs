//! Error types for spalaunch.

use std::path::PathBuf;

use thiserror::Error;

/// Launcher error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Invalid archive {}: {reason}", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("Unsafe archive entry: {0}")]
    UnsafeArchiveEntry(String),

    #[error("Port {port} is unavailable: {source}")]
    PortUnavailable {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid port: {0:?}")]
    InvalidPort(String),

    #[error("No start script found in {}", .0.display())]
    NoStartScriptFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
