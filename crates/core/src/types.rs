//! Domain types for conversion requests and results.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The format of a source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }

    /// Canonical lowercase extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Ppt => "ppt",
        }
    }
}

/// Whether `path` has one of `extensions`, compared case-insensitively.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Default output path for an input: same location, `.pdf` extension.
pub fn default_pdf_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// Result of converting one file inside a batch.
#[derive(Debug)]
pub enum FileOutcome {
    /// The PDF was written to this path.
    Converted(PathBuf),
    /// Conversion failed; the batch carried on.
    Failed(Error),
}

impl FileOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Aggregate result of a batch conversion.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Directory that was scanned.
    pub input_dir: PathBuf,

    /// Directory the PDFs were written to.
    pub output_dir: PathBuf,

    /// Number of matching files found.
    pub total: usize,

    /// Output paths of successful conversions, in processing order.
    pub converted: Vec<PathBuf>,

    /// Inputs that failed, with the reason.
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    /// Create an empty report for a batch over `total` files.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, total: usize) -> Self {
        Self {
            input_dir,
            output_dir,
            total,
            converted: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record the outcome for one input file.
    pub fn record(&mut self, input: PathBuf, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted(output) => self.converted.push(output),
            FileOutcome::Failed(err) => self.failures.push((input, err)),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.converted.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.succeeded() == self.total
    }

    /// Serializable view of the report.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            total: self.total,
            succeeded: self.succeeded(),
            failed: self.failed(),
            converted: self.converted.clone(),
            failures: self
                .failures
                .iter()
                .map(|(input, err)| FailureEntry {
                    input: input.clone(),
                    error: err.to_string(),
                })
                .collect(),
        }
    }
}

/// Serializable summary of a [`BatchReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub converted: Vec<PathBuf>,
    pub failures: Vec<FailureEntry>,
}

/// One failed input in a [`BatchSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub input: PathBuf,
    pub error: String,
}
