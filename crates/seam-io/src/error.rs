//! Error types for file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing geometry files.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but its contents are not valid for the format.
    #[error("{format} format error: {reason}")]
    Format {
        /// The format being parsed.
        format: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// An underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Builds a format error.
    #[must_use]
    pub fn format(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Format {
            format,
            reason: reason.into(),
        }
    }
}

/// Result type for file I/O operations.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Opens a file for reading, mapping a missing file to
/// [`IoError::FileNotFound`].
pub(crate) fn open(path: &std::path::Path) -> IoResult<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })
}
