//! Error types for PowerPoint to PDF conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting presentations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file or directory does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The output file exists and overwriting is disabled.
    #[error("Output file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The presentation application could not be located, started, or was
    /// already closed.
    #[error("Presentation application unavailable: {0}")]
    ApplicationUnavailable(String),

    /// The application failed while opening, exporting or closing a document.
    #[error("Error converting {}: {reason}", .path.display())]
    ConversionFailed { path: PathBuf, reason: String },

    /// A batch directory contained no matching presentation files.
    #[error("No presentation files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    /// A call into the presentation application failed.
    ///
    /// Backends return this; the converter attaches the input path and
    /// reports it as [`Error::ConversionFailed`].
    #[error("{0}")]
    Backend(String),

    /// Filesystem error outside of the application calls.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a backend error from anything displayable.
    pub fn backend(message: impl std::fmt::Display) -> Self {
        Self::Backend(message.to_string())
    }

    /// Whether this failure was decided before the application was invoked.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::AlreadyExists(_))
    }
}
