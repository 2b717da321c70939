//! Batch progress observers.

use crate::types::{BatchReport, FileOutcome};
use std::path::Path;

/// Receives progress events while a batch runs.
///
/// Every method defaults to doing nothing.
pub trait Progress {
    /// Called once with the number of files about to be converted.
    fn begin(&mut self, _total: usize) {}

    /// Called after each file, whether it converted or not.
    fn advance(&mut self, _input: &Path, _outcome: &FileOutcome) {}

    /// Called once after the last file.
    fn finish(&mut self, _report: &BatchReport) {}
}

/// Progress observer that reports nothing, for front ends that show their
/// own status.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {}
