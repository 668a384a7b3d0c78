// THEORY:
// Two severities exist in this crate. Anything that leaves a pixel buffer or a
// dataset in a state that cannot be trusted (an undecodable file, a buffer whose
// length disagrees with its geometry, an output file that cannot be created) is
// a `HinaError` and travels up with `?`. Directory listing problems are softer:
// they are collected as `ScanError` values next to the partial listing, and only
// become a `HinaError::Scan` when the caller asks for the strict policy.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HinaError>;

#[derive(Error, Debug)]
pub enum HinaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be opened or is not an image the codec understands.
    #[error("Failed to decode image at '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image at '{}': {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A buffer length does not match the geometry it was passed with.
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Length mismatch: keys has {keys} entries, payload has {payload}")]
    LengthMismatch { keys: usize, payload: usize },

    /// A directory scan problem promoted to a hard failure.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A background decode task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

/// A soft failure produced while listing a directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot list '{}': {message}", .path.display())]
pub struct ScanError {
    pub path: PathBuf,
    pub message: String,
}

impl ScanError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
