//! Single-file and batch conversion on top of a [`PresentationApp`].

use crate::backend::PresentationApp;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::types::{default_pdf_path, has_extension, BatchReport, FileOutcome};
use std::fs;
use std::path::{Path, PathBuf};

/// Drives a presentation application to turn presentations into PDFs.
///
/// Owns the application handle until [`Converter::close`] is called or the
/// converter is dropped.
pub struct Converter<A: PresentationApp> {
    app: Option<A>,
    extensions: Vec<String>,
}

impl<A: PresentationApp> Converter<A> {
    /// Create a converter that owns `app`. Batches match `.pptx` files.
    pub fn new(app: A) -> Self {
        Self {
            app: Some(app),
            extensions: vec!["pptx".to_string()],
        }
    }

    /// Set the file extensions matched by [`Converter::batch_convert`].
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    /// Extensions matched by batch conversion.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// The application, if the converter has not been closed.
    pub fn app(&self) -> Option<&A> {
        self.app.as_ref()
    }

    /// Whether the application handle is still held.
    pub fn is_open(&self) -> bool {
        self.app.is_some()
    }

    /// Convert one presentation to PDF.
    ///
    /// `output` defaults to the input path with a `.pdf` extension. The
    /// application is not invoked when the input is missing or when the
    /// output exists and `overwrite` is false.
    pub fn convert_single_file(
        &mut self,
        input: &Path,
        output: Option<&Path>,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let result = self.convert_inner(input, output, overwrite);
        match &result {
            Ok(output) => {
                log::info!(
                    "Successfully converted: {} -> {}",
                    input.display(),
                    output.display()
                );
            }
            Err(Error::AlreadyExists(path)) => {
                log::warn!("Output file already exists: {}", path.display());
            }
            Err(err @ Error::ConversionFailed { .. }) => log::error!("{}", err),
            Err(err) => log::error!("Error converting {}: {}", input.display(), err),
        }
        result
    }

    fn convert_inner(
        &mut self,
        input: &Path,
        output: Option<&Path>,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let input = std::path::absolute(input)?;
        let output = match output {
            Some(path) => std::path::absolute(path)?,
            None => default_pdf_path(&input),
        };

        if !input.exists() {
            return Err(Error::FileNotFound(input));
        }
        if output.exists() && !overwrite {
            return Err(Error::AlreadyExists(output));
        }

        let app = self.app.as_mut().ok_or_else(|| {
            Error::ApplicationUnavailable("the converter has been closed".to_string())
        })?;

        run_export(app, &input, &output).map_err(|err| Error::ConversionFailed {
            path: input.clone(),
            reason: err.to_string(),
        })?;

        Ok(output)
    }

    /// Convert every matching presentation directly inside `input_dir`.
    ///
    /// PDFs go to `output_dir` (created if needed) or next to the inputs.
    /// Individual failures are recorded in the report and never stop the
    /// batch. A directory without matching files is [`Error::NoFilesFound`].
    pub fn batch_convert(
        &mut self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        overwrite: bool,
        progress: &mut dyn Progress,
    ) -> Result<BatchReport> {
        let result = self.batch_inner(input_dir, output_dir, overwrite, progress);
        match &result {
            Ok(report) => log::info!(
                "Batch conversion completed. {}/{} files converted successfully",
                report.succeeded(),
                report.total
            ),
            Err(err @ Error::NoFilesFound(_)) => log::warn!("{}", err),
            Err(err) => log::error!("Error in batch conversion: {}", err),
        }
        result
    }

    fn batch_inner(
        &mut self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        overwrite: bool,
        progress: &mut dyn Progress,
    ) -> Result<BatchReport> {
        let input_dir = std::path::absolute(input_dir)?;
        if !input_dir.is_dir() {
            return Err(Error::FileNotFound(input_dir));
        }

        let output_dir = match output_dir {
            Some(dir) => {
                let dir = std::path::absolute(dir)?;
                fs::create_dir_all(&dir)?;
                dir
            }
            None => input_dir.clone(),
        };

        let files = find_presentations(&input_dir, &self.extensions)?;
        if files.is_empty() {
            return Err(Error::NoFilesFound(input_dir));
        }

        log::debug!(
            "Found {} presentation files in {}",
            files.len(),
            input_dir.display()
        );

        let mut report = BatchReport::new(input_dir, output_dir.clone(), files.len());
        progress.begin(files.len());

        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            log::info!("Batch converting: {}", name.to_string_lossy());

            let target = output_dir.join(Path::new(name).with_extension("pdf"));
            let outcome = match self.convert_single_file(&file, Some(&target), overwrite) {
                Ok(path) => FileOutcome::Converted(path),
                Err(err) => FileOutcome::Failed(err),
            };

            progress.advance(&file, &outcome);
            report.record(file, outcome);
        }

        progress.finish(&report);
        Ok(report)
    }

    /// Quit the application and release the handle.
    ///
    /// The handle is released even when quitting fails; the failure is
    /// logged and returned. Closing again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut app) = self.app.take() else {
            return Ok(());
        };

        match app.quit() {
            Ok(()) => {
                log::info!("{} closed", app.name());
                Ok(())
            }
            Err(err) => {
                log::warn!("Error during {} quit: {}", app.name(), err);
                Err(err)
            }
        }
    }
}

impl<A: PresentationApp> Drop for Converter<A> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Open, export and close one document. The document is closed even when
/// the export fails.
fn run_export<A: PresentationApp>(app: &mut A, input: &Path, output: &Path) -> Result<()> {
    let doc = app.open(input)?;

    if let Err(err) = app.export_pdf(&doc, output) {
        if let Err(close_err) = app.close(doc) {
            log::debug!(
                "Ignoring close failure after failed export of {}: {}",
                input.display(),
                close_err
            );
        }
        return Err(err);
    }

    app.close(doc)
}

/// Regular files directly inside `dir` with a matching extension, sorted by
/// name.
fn find_presentations(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Silent;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Open(PathBuf),
        Export(PathBuf),
        Close(PathBuf),
        Quit,
    }

    /// In-memory application that writes a stub PDF and records every call.
    #[derive(Default)]
    struct FakeApp {
        calls: Rc<RefCell<Vec<Call>>>,
        fail_open_for: Vec<String>,
        fail_export: bool,
        fail_quit: bool,
    }

    impl FakeApp {
        fn new() -> (Self, Rc<RefCell<Vec<Call>>>) {
            let app = Self::default();
            let calls = Rc::clone(&app.calls);
            (app, calls)
        }
    }

    impl PresentationApp for FakeApp {
        type Document = PathBuf;

        fn name(&self) -> &str {
            "FakeApp"
        }

        fn open(&mut self, path: &Path) -> Result<PathBuf> {
            self.calls.borrow_mut().push(Call::Open(path.to_path_buf()));
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if self.fail_open_for.contains(&name) {
                return Err(Error::backend("corrupt presentation"));
            }
            Ok(path.to_path_buf())
        }

        fn export_pdf(&mut self, _doc: &PathBuf, output: &Path) -> Result<()> {
            self.calls.borrow_mut().push(Call::Export(output.to_path_buf()));
            if self.fail_export {
                return Err(Error::backend("export raised"));
            }
            fs::write(output, b"%PDF-1.4\n")?;
            Ok(())
        }

        fn close(&mut self, doc: PathBuf) -> Result<()> {
            self.calls.borrow_mut().push(Call::Close(doc));
            Ok(())
        }

        fn quit(&mut self) -> Result<()> {
            self.calls.borrow_mut().push(Call::Quit);
            if self.fail_quit {
                return Err(Error::backend("quit raised"));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        advanced: usize,
        finished: bool,
    }

    impl Progress for Recorder {
        fn begin(&mut self, total: usize) {
            self.total = Some(total);
        }

        fn advance(&mut self, _input: &Path, _outcome: &FileOutcome) {
            self.advanced += 1;
        }

        fn finish(&mut self, _report: &BatchReport) {
            self.finished = true;
        }
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"PK\x03\x04").unwrap();
        path
    }

    #[test]
    fn test_single_file_converts_next_to_input() {
        let tmp = TempDir::new().unwrap();
        let input = touch(tmp.path(), "talk.pptx");
        let (app, calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        let output = converter.convert_single_file(&input, None, false).unwrap();

        assert_eq!(output, tmp.path().join("talk.pdf"));
        assert!(output.exists());
        assert_eq!(
            *calls.borrow(),
            vec![
                Call::Open(input.clone()),
                Call::Export(output.clone()),
                Call::Close(input),
            ]
        );
    }

    #[test]
    fn test_missing_input_does_not_touch_application() {
        let tmp = TempDir::new().unwrap();
        let (app, calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        let err = converter
            .convert_single_file(&tmp.path().join("missing.pptx"), None, true)
            .unwrap_err();

        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_existing_output_without_overwrite_does_not_touch_application() {
        let tmp = TempDir::new().unwrap();
        let input = touch(tmp.path(), "talk.pptx");
        let output = tmp.path().join("talk.pdf");
        fs::write(&output, b"old").unwrap();
        let (app, calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        let err = converter
            .convert_single_file(&input, Some(&output), false)
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyExists(ref p) if *p == output));
        assert!(err.is_precondition());
        assert!(calls.borrow().is_empty());
        assert_eq!(fs::read(&output).unwrap(), b"old");
    }

    #[test]
    fn test_existing_output_with_overwrite_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let input = touch(tmp.path(), "talk.pptx");
        let output = tmp.path().join("talk.pdf");
        fs::write(&output, b"old").unwrap();
        let (app, _calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        converter
            .convert_single_file(&input, Some(&output), true)
            .unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"%PDF-1.4\n");
    }

    #[test]
    fn test_export_failure_still_closes_document() {
        let tmp = TempDir::new().unwrap();
        let input = touch(tmp.path(), "talk.pptx");
        let (mut app, calls) = FakeApp::new();
        app.fail_export = true;
        let mut converter = Converter::new(app);

        let err = converter.convert_single_file(&input, None, false).unwrap_err();

        match err {
            Error::ConversionFailed { path, reason } => {
                assert_eq!(path, input);
                assert!(reason.contains("export raised"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.borrow().last(), Some(&Call::Close(input)));
    }

    #[test]
    fn test_closed_converter_reports_unavailable() {
        let tmp = TempDir::new().unwrap();
        let input = touch(tmp.path(), "talk.pptx");
        let (app, calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        converter.close().unwrap();
        converter.close().unwrap();
        let err = converter.convert_single_file(&input, None, false).unwrap_err();

        assert!(matches!(err, Error::ApplicationUnavailable(_)));
        assert!(!converter.is_open());
        assert_eq!(*calls.borrow(), vec![Call::Quit]);
    }

    #[test]
    fn test_close_failure_is_returned_and_handle_released() {
        let (mut app, calls) = FakeApp::new();
        app.fail_quit = true;
        let mut converter = Converter::new(app);

        assert!(converter.close().is_err());
        assert!(!converter.is_open());
        drop(converter);
        assert_eq!(*calls.borrow(), vec![Call::Quit]);
    }

    #[test]
    fn test_drop_quits_application() {
        let (app, calls) = FakeApp::new();
        drop(Converter::new(app));
        assert_eq!(*calls.borrow(), vec![Call::Quit]);
    }

    #[test]
    fn test_batch_counts_successes_past_failures() {
        let tmp = TempDir::new().unwrap();
        let input_dir = tmp.path().join("decks");
        let output_dir = tmp.path().join("pdfs");
        fs::create_dir(&input_dir).unwrap();
        for name in ["a.pptx", "b.pptx", "c.PPTX", "d.pptx", "e.pptx"] {
            touch(&input_dir, name);
        }
        touch(&input_dir, "notes.txt");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join("b.pdf"), b"old").unwrap();

        let (mut app, _calls) = FakeApp::new();
        app.fail_open_for = vec!["d.pptx".to_string()];
        let mut converter = Converter::new(app);
        let mut recorder = Recorder::default();

        let report = converter
            .batch_convert(&input_dir, Some(&output_dir), false, &mut recorder)
            .unwrap();

        assert_eq!(report.total, 5);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.converted,
            vec![
                output_dir.join("a.pdf"),
                output_dir.join("c.pdf"),
                output_dir.join("e.pdf"),
            ]
        );
        assert!(matches!(report.failures[0].1, Error::AlreadyExists(_)));
        assert!(matches!(report.failures[1].1, Error::ConversionFailed { .. }));
        assert_eq!(recorder.total, Some(5));
        assert_eq!(recorder.advanced, 5);
        assert!(recorder.finished);
    }

    #[test]
    fn test_batch_creates_output_dir_and_defaults_to_input_dir() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.pptx");
        let (app, _calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        let nested = tmp.path().join("out").join("nested");
        let report = converter
            .batch_convert(tmp.path(), Some(&nested), false, &mut Silent)
            .unwrap();
        assert!(nested.join("a.pdf").exists());
        assert!(report.all_succeeded());

        let report = converter
            .batch_convert(tmp.path(), None, false, &mut Silent)
            .unwrap();
        assert_eq!(report.output_dir, tmp.path());
        assert!(tmp.path().join("a.pdf").exists());
    }

    #[test]
    fn test_batch_without_matching_files_does_not_touch_application() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "old.ppt");
        fs::create_dir(tmp.path().join("sub.pptx")).unwrap();
        let (app, calls) = FakeApp::new();
        let mut converter = Converter::new(app);
        let mut recorder = Recorder::default();

        let err = converter
            .batch_convert(tmp.path(), None, false, &mut recorder)
            .unwrap_err();

        assert!(matches!(err, Error::NoFilesFound(_)));
        assert!(calls.borrow().is_empty());
        assert_eq!(recorder.total, None);
    }

    #[test]
    fn test_batch_extensions_are_configurable() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "old.ppt");
        touch(tmp.path(), "new.pptx");
        let (app, _calls) = FakeApp::new();
        let mut converter =
            Converter::new(app).with_extensions(vec!["ppt".to_string(), "pptx".to_string()]);

        let report = converter
            .batch_convert(tmp.path(), None, false, &mut Silent)
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded(), 2);
    }

    #[test]
    fn test_batch_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let (app, _calls) = FakeApp::new();
        let mut converter = Converter::new(app);

        let err = converter
            .batch_convert(&tmp.path().join("nope"), None, false, &mut Silent)
            .unwrap_err();

        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
