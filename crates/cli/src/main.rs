//! CLI tool for converting PowerPoint files to PDF.

mod bar;
mod menu;

use anyhow::{Context, Result};
use bar::BarProgress;
use clap::{Args as ClapArgs, Parser, Subcommand};
use menu::MenuOutcome;
use pptpdf_core::reveal::{containing_folder, open_folder};
use pptpdf_core::{init_logging, Config, Converter, Error};
use pptpdf_soffice::{SofficeApp, TROUBLESHOOTING};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert PowerPoint presentations to PDF using LibreOffice.
#[derive(Parser, Debug)]
#[command(name = "pptpdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (default: pptpdf.json in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log file (default: conversion.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log to stderr instead of a file
    #[arg(long, global = true, conflicts_with = "log_file")]
    log_stderr: bool,

    /// Path to the soffice program
    #[arg(long, global = true)]
    soffice: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a single presentation
    Convert(ConvertArgs),
    /// Convert every presentation in a folder
    Batch(BatchArgs),
    /// Locate and start LibreOffice, then report what was found
    Check,
    /// Choose an action and enter paths interactively
    Menu,
}

#[derive(ClapArgs, Debug)]
struct ConvertArgs {
    /// Input PowerPoint file (.pptx or .ppt)
    input: PathBuf,

    /// Output PDF (default: input path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing PDF
    #[arg(long)]
    overwrite: bool,

    /// Open the output folder afterwards
    #[arg(long)]
    open: bool,
}

#[derive(ClapArgs, Debug)]
struct BatchArgs {
    /// Folder containing the presentations
    input_dir: PathBuf,

    /// Output folder (default: the input folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace existing PDFs
    #[arg(long)]
    overwrite: bool,

    /// Extension to pick up; repeat for several (default: pptx)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Open the output folder afterwards
    #[arg(long)]
    open: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nError: {:#}", e);
            log::error!("Application error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref())?;
    if args.log_stderr {
        config.log_file = None;
    } else if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(program) = &args.soffice {
        config.soffice.program = Some(program.clone());
    }
    if let Commands::Batch(batch) = &args.command {
        if !batch.extensions.is_empty() {
            config.extensions = batch.extensions.clone();
        }
    }

    init_logging(config.log_file.as_deref(), args.verbose)
        .context("Failed to open the log file")?;

    if args.verbose {
        eprintln!("Attempting to start LibreOffice...");
    }
    let mut converter = start_converter(&config)?;
    if args.verbose {
        if let Some(app) = converter.app() {
            eprintln!("Using {}", app.program().display());
        }
    }

    let code = match &args.command {
        Commands::Convert(convert) => run_convert(&mut converter, convert, &config),
        Commands::Batch(batch) => run_batch(&mut converter, batch, &config)?,
        Commands::Check => run_check(&converter),
        Commands::Menu => run_menu(&mut converter, &config)?,
    };

    if let Err(e) = converter.close() {
        eprintln!("Warning: Error while closing LibreOffice: {}", e);
    } else if args.verbose {
        eprintln!("LibreOffice closed");
    }

    Ok(code)
}

/// Start LibreOffice, printing troubleshooting steps when it is unavailable.
fn start_converter(config: &Config) -> Result<Converter<SofficeApp>> {
    match SofficeApp::launch(&config.soffice) {
        Ok(app) => Ok(Converter::new(app).with_extensions(config.extensions.clone())),
        Err(e) => {
            log::error!("Failed to initialize LibreOffice: {}", e);
            eprintln!("\nTroubleshooting steps:");
            for (i, hint) in TROUBLESHOOTING.iter().enumerate() {
                eprintln!("{}. {}", i + 1, hint);
            }
            Err(e).context("LibreOffice not installed or not accessible")
        }
    }
}

fn run_convert(
    converter: &mut Converter<SofficeApp>,
    args: &ConvertArgs,
    config: &Config,
) -> ExitCode {
    let overwrite = args.overwrite || config.overwrite;

    match converter.convert_single_file(&args.input, args.output.as_deref(), overwrite) {
        Ok(pdf) => {
            println!("Success! PDF created at: {}", pdf.display());
            if args.open {
                reveal(containing_folder(&pdf));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Conversion failed: {}", e);
            point_at_log(config);
            ExitCode::FAILURE
        }
    }
}

fn run_batch(
    converter: &mut Converter<SofficeApp>,
    args: &BatchArgs,
    config: &Config,
) -> Result<ExitCode> {
    let overwrite = args.overwrite || config.overwrite;
    let mut progress = BarProgress::new(args.no_progress || args.json);

    let report = match converter.batch_convert(
        &args.input_dir,
        args.output.as_deref(),
        overwrite,
        &mut progress,
    ) {
        Ok(report) => report,
        Err(e @ Error::NoFilesFound(_)) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("Batch conversion failed: {}", e);
            point_at_log(config);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report.summary())
            .context("Failed to serialize the batch report")?;
        println!("{}", json);
    } else {
        println!(
            "\nBatch conversion completed: {}/{} files converted successfully",
            report.succeeded(),
            report.total
        );
        for (input, e) in &report.failures {
            eprintln!("  {}: {}", input.display(), e);
        }
    }

    if args.open && report.succeeded() > 0 {
        reveal(&report.output_dir);
    }

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        point_at_log(config);
        Ok(ExitCode::FAILURE)
    }
}

fn run_check(converter: &Converter<SofficeApp>) -> ExitCode {
    match converter.app() {
        Some(app) => {
            println!("Program: {}", app.program().display());
            println!("Version: {}", app.version());
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}

fn run_menu(converter: &mut Converter<SofficeApp>, config: &Config) -> Result<ExitCode> {
    println!(
        "\nWorking directory: {}",
        std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default()
    );

    let mut progress = BarProgress::new(false);
    let stdin = io::stdin();
    let outcome = menu::run_menu(
        converter,
        config.overwrite,
        &mut progress,
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;

    Ok(match outcome {
        MenuOutcome::Done { success, reveal: folder } => {
            if let Some(folder) = folder {
                reveal(&folder);
            }
            if success {
                ExitCode::SUCCESS
            } else {
                point_at_log(config);
                ExitCode::FAILURE
            }
        }
        MenuOutcome::Cancelled => ExitCode::SUCCESS,
        MenuOutcome::InvalidChoice => ExitCode::FAILURE,
    })
}

fn reveal(folder: &Path) {
    if let Err(e) = open_folder(folder) {
        eprintln!("Warning: Could not open the output folder: {}", e);
        log::warn!("Could not open {}: {}", folder.display(), e);
    }
}

fn point_at_log(config: &Config) {
    if let Some(log_file) = &config.log_file {
        eprintln!("Check {} for details.", log_file.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_batch_args() {
        let args = Args::parse_from([
            "pptpdf", "batch", "decks", "-o", "pdfs", "--ext", "ppt", "--ext", "pptx", "--json",
            "--log-stderr",
        ]);

        assert!(args.log_stderr);
        match args.command {
            Commands::Batch(batch) => {
                assert_eq!(batch.input_dir, PathBuf::from("decks"));
                assert_eq!(batch.output, Some(PathBuf::from("pdfs")));
                assert_eq!(batch.extensions, vec!["ppt".to_string(), "pptx".to_string()]);
                assert!(batch.json);
                assert!(!batch.overwrite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_convert_args() {
        let args = Args::parse_from(["pptpdf", "-v", "convert", "talk.pptx", "--overwrite"]);
        assert!(args.verbose);
        match args.command {
            Commands::Convert(convert) => {
                assert_eq!(convert.input, PathBuf::from("talk.pptx"));
                assert_eq!(convert.output, None);
                assert!(convert.overwrite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_log_flags_conflict() {
        let result = Args::try_parse_from([
            "pptpdf", "--log-file", "x.log", "--log-stderr", "check",
        ]);
        assert!(result.is_err());
    }
}
