//! Terminal form for converting PowerPoint files to PDF.

mod app;
mod keys;
mod ui;

use anyhow::{Context, Result};
use app::App;
use pptpdf_core::config::DEFAULT_LOG_FILE;
use pptpdf_core::{init_logging, Config, Converter};
use pptpdf_soffice::{SofficeApp, TROUBLESHOOTING};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = Config::load(None)?;

    // The form owns the terminal, so logs always go to a file.
    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    init_logging(Some(log_file.as_path()), false).context("Failed to open the log file")?;

    let soffice = match SofficeApp::launch(&config.soffice) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to initialize LibreOffice: {}", e);
            eprintln!("\nTroubleshooting steps:");
            for (i, hint) in TROUBLESHOOTING.iter().enumerate() {
                eprintln!("{}. {}", i + 1, hint);
            }
            return Err(e).context("An error occurred while starting the converter");
        }
    };

    let converter = Converter::new(soffice).with_extensions(config.extensions.clone());
    let form = App::new(converter, log_file.display().to_string());

    if let Some(warning) = form.run()? {
        eprintln!("Cleanup Warning: {}", warning);
    }
    Ok(())
}
