//! Error types for dataset I/O.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// I/O error during file operations.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Image encoding error.
    #[error("image error at '{path}': {source}")]
    Image {
        /// The image path.
        path: PathBuf,
        /// The underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// A required CSV column is absent.
    #[error("'{path}' is missing required column '{column}'")]
    MissingColumn {
        /// The CSV file.
        path: PathBuf,
        /// The missing column name.
        column: String,
    },

    /// A value could not be parsed.
    #[error("parse error in '{path}' line {line}: {reason}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// The metadata file has no easy-copy block.
    #[error("'{path}' has no easy-copy block")]
    MissingBlock {
        /// The metadata file.
        path: PathBuf,
    },

    /// A frame has no pixels to write.
    #[error("frame {index} is not ready")]
    FrameNotReady {
        /// Frame index.
        index: usize,
    },

    /// A log has no samples.
    #[error("'{path}' contains no samples")]
    Empty {
        /// The file.
        path: PathBuf,
    },
}

impl DatasetError {
    /// Create an I/O error for a path.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    /// Check if this is a missing-column error.
    #[must_use]
    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}
