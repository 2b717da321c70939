//! Terminal progress bar for batch conversion.

use indicatif::{ProgressBar, ProgressStyle};
use pptpdf_core::{BatchReport, FileOutcome, Progress};
use std::path::Path;

/// Draws a `Converting [####    ] 3/8` bar on stderr.
pub struct BarProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl BarProgress {
    pub fn new(hidden: bool) -> Self {
        Self { bar: None, hidden }
    }
}

impl Progress for BarProgress {
    fn begin(&mut self, total: usize) {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total as u64)
        };
        let style = ProgressStyle::with_template("{prefix} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_prefix("Converting");
        self.bar = Some(bar);
    }

    fn advance(&mut self, input: &Path, outcome: &FileOutcome) {
        let Some(bar) = &self.bar else {
            return;
        };
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let FileOutcome::Failed(err) = outcome {
            bar.println(format!("Failed: {} ({})", name, err));
        }
        bar.set_message(name);
        bar.inc(1);
    }

    fn finish(&mut self, _report: &BatchReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
