//! Interactive prompt-driven conversion.

use anyhow::Result;
use pptpdf_core::reveal::containing_folder;
use pptpdf_core::types::default_pdf_path;
use pptpdf_core::{Converter, Error, PresentationApp, Progress};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// How an interactive session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The user gave up at a prompt.
    Cancelled,
    /// Work was done. `reveal` is the folder the user asked to open.
    Done { success: bool, reveal: Option<PathBuf> },
    /// The menu choice was not understood.
    InvalidChoice,
}

/// Ask which conversion to run, collect paths, and run it.
pub fn run_menu<A, R, W>(
    converter: &mut Converter<A>,
    overwrite: bool,
    progress: &mut dyn Progress,
    input: &mut R,
    out: &mut W,
) -> Result<MenuOutcome>
where
    A: PresentationApp,
    R: BufRead,
    W: Write,
{
    writeln!(out, "\nWhat would you like to do?")?;
    writeln!(out, "1. Convert single PPTX file")?;
    writeln!(out, "2. Batch convert all PPTX files in a folder")?;

    match prompt(input, out, "\nEnter your choice (1 or 2): ")?.as_deref() {
        Some("1") => single(converter, overwrite, input, out),
        Some("2") => batch(converter, overwrite, progress, input, out),
        _ => {
            writeln!(out, "\nInvalid choice!")?;
            Ok(MenuOutcome::InvalidChoice)
        }
    }
}

fn single<A, R, W>(
    converter: &mut Converter<A>,
    overwrite: bool,
    input: &mut R,
    out: &mut W,
) -> Result<MenuOutcome>
where
    A: PresentationApp,
    R: BufRead,
    W: Write,
{
    let Some(source) = prompt(input, out, "\nPath of the PowerPoint file to convert: ")? else {
        writeln!(out, "\nNo file selected.")?;
        return Ok(MenuOutcome::Cancelled);
    };
    let source = PathBuf::from(source);

    let suggested = default_pdf_path(&source);
    let question = format!("Save PDF as [{}]: ", suggested.display());
    let target = prompt(input, out, &question)?
        .map(PathBuf::from)
        .unwrap_or(suggested);

    writeln!(out, "\nConverting: {}", source.display())?;
    match converter.convert_single_file(&source, Some(&target), overwrite) {
        Ok(pdf) => {
            writeln!(out, "\nSuccess! PDF created at: {}", pdf.display())?;
            let reveal = confirm(input, out, "Open the output folder? [y/N]: ")?
                .then(|| containing_folder(&pdf).to_path_buf());
            Ok(MenuOutcome::Done { success: true, reveal })
        }
        Err(err) => {
            writeln!(out, "\nConversion failed: {}", err)?;
            writeln!(out, "Check the log file for details.")?;
            Ok(MenuOutcome::Done { success: false, reveal: None })
        }
    }
}

fn batch<A, R, W>(
    converter: &mut Converter<A>,
    overwrite: bool,
    progress: &mut dyn Progress,
    input: &mut R,
    out: &mut W,
) -> Result<MenuOutcome>
where
    A: PresentationApp,
    R: BufRead,
    W: Write,
{
    let Some(source_dir) = prompt(input, out, "\nFolder containing PowerPoint files: ")? else {
        writeln!(out, "\nNo input folder selected. Operation cancelled.")?;
        return Ok(MenuOutcome::Cancelled);
    };
    let Some(target_dir) = prompt(input, out, "Folder to save the converted PDFs: ")? else {
        writeln!(out, "\nNo output folder selected. Operation cancelled.")?;
        return Ok(MenuOutcome::Cancelled);
    };

    writeln!(out, "\nInput folder: {}", source_dir)?;
    writeln!(out, "Output folder: {}", target_dir)?;

    let target_dir = PathBuf::from(target_dir);
    match converter.batch_convert(Path::new(&source_dir), Some(&target_dir), overwrite, progress) {
        Ok(report) => {
            writeln!(
                out,
                "\nBatch conversion completed: {}/{} files converted successfully",
                report.succeeded(),
                report.total
            )?;
            let reveal = confirm(input, out, "Open the output folder? [y/N]: ")?
                .then(|| report.output_dir.clone());
            Ok(MenuOutcome::Done {
                success: report.all_succeeded(),
                reveal,
            })
        }
        Err(err @ Error::NoFilesFound(_)) => {
            writeln!(out, "\n{}", err)?;
            Ok(MenuOutcome::Done { success: false, reveal: None })
        }
        Err(err) => {
            writeln!(out, "\nError: {}", err)?;
            Ok(MenuOutcome::Done { success: false, reveal: None })
        }
    }
}

/// Print `question` and read one trimmed line. Empty answers and end of
/// input are `None`.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    Ok(matches!(
        prompt(input, out, question)?.as_deref(),
        Some("y" | "Y" | "yes" | "Yes")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pptpdf_core::Silent;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct StubApp;

    impl PresentationApp for StubApp {
        type Document = ();

        fn name(&self) -> &str {
            "StubApp"
        }

        fn open(&mut self, _path: &Path) -> pptpdf_core::Result<()> {
            Ok(())
        }

        fn export_pdf(&mut self, _doc: &(), output: &Path) -> pptpdf_core::Result<()> {
            fs::write(output, b"%PDF")?;
            Ok(())
        }

        fn close(&mut self, _doc: ()) -> pptpdf_core::Result<()> {
            Ok(())
        }

        fn quit(&mut self) -> pptpdf_core::Result<()> {
            Ok(())
        }
    }

    fn run(answers: &str) -> (MenuOutcome, String) {
        let mut converter = Converter::new(StubApp);
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        let outcome =
            run_menu(&mut converter, false, &mut Silent, &mut input, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_uses_suggested_name() {
        let tmp = TempDir::new().unwrap();
        let deck = tmp.path().join("sermon.pptx");
        fs::write(&deck, b"PK\x03\x04").unwrap();

        let (outcome, text) = run(&format!("1\n{}\n\nn\n", deck.display()));

        assert_eq!(outcome, MenuOutcome::Done { success: true, reveal: None });
        assert!(tmp.path().join("sermon.pdf").exists());
        assert!(text.contains("Success! PDF created at:"));
    }

    #[test]
    fn test_single_reveal_requested() {
        let tmp = TempDir::new().unwrap();
        let deck = tmp.path().join("sermon.pptx");
        fs::write(&deck, b"PK\x03\x04").unwrap();
        let target = tmp.path().join("out.pdf");

        let (outcome, _) = run(&format!("1\n{}\n{}\ny\n", deck.display(), target.display()));

        assert_eq!(
            outcome,
            MenuOutcome::Done {
                success: true,
                reveal: Some(tmp.path().to_path_buf())
            }
        );
        assert!(target.exists());
    }

    #[test]
    fn test_single_cancelled_without_input() {
        let (outcome, text) = run("1\n\n");
        assert_eq!(outcome, MenuOutcome::Cancelled);
        assert!(text.contains("No file selected."));
    }

    #[test]
    fn test_batch_reports_counts() {
        let tmp = TempDir::new().unwrap();
        let decks = tmp.path().join("decks");
        fs::create_dir(&decks).unwrap();
        fs::write(decks.join("a.pptx"), b"PK\x03\x04").unwrap();
        fs::write(decks.join("b.pptx"), b"PK\x03\x04").unwrap();
        let pdfs = tmp.path().join("pdfs");

        let (outcome, text) = run(&format!("2\n{}\n{}\n\n", decks.display(), pdfs.display()));

        assert_eq!(outcome, MenuOutcome::Done { success: true, reveal: None });
        assert!(text.contains("2/2 files converted successfully"));
        assert!(pdfs.join("a.pdf").exists());
    }

    #[test]
    fn test_batch_empty_folder() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().display();
        let (outcome, text) = run(&format!("2\n{}\n{}\n", dir, dir));
        assert_eq!(outcome, MenuOutcome::Done { success: false, reveal: None });
        assert!(text.contains("No presentation files found"));
    }

    #[test]
    fn test_invalid_choice() {
        let (outcome, text) = run("3\n");
        assert_eq!(outcome, MenuOutcome::InvalidChoice);
        assert!(text.contains("Invalid choice!"));
    }
}
