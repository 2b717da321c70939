//! The contract between the converter and a presentation application.
//!
//! The application is an opaque external capability. Whatever bridge reaches
//! it (an automation object, a command-line utility) only has to open a
//! file, export the open document to PDF, close it, and quit.

use crate::error::Result;
use std::path::Path;

/// A running presentation application.
///
/// Errors from any call are reported by the converter as
/// [`Error::ConversionFailed`](crate::Error::ConversionFailed), except for
/// `quit`, whose errors are only logged.
pub trait PresentationApp {
    /// Handle to an open document.
    type Document;

    /// Human-readable name used in log messages.
    fn name(&self) -> &str;

    /// Open the file at `path`.
    fn open(&mut self, path: &Path) -> Result<Self::Document>;

    /// Export the open document to a PDF at `output`.
    fn export_pdf(&mut self, doc: &Self::Document, output: &Path) -> Result<()>;

    /// Close the document.
    fn close(&mut self, doc: Self::Document) -> Result<()>;

    /// Quit the application. Must tolerate being called more than once.
    fn quit(&mut self) -> Result<()>;
}
