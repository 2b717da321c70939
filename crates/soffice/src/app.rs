//! [`PresentationApp`] implementation driving LibreOffice in headless mode.

use crate::locate::Locator;
use crate::process::{run_with_timeout, Finished};
use pptpdf_core::{Error, PresentationApp, PresentationFormat, Result, SofficeConfig};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

/// Export filter for presentations.
const PDF_FILTER: &str = "pdf:impress_pdf_Export";

/// Timeout for the start-up probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// A LibreOffice installation ready to convert documents.
///
/// Each instance runs with its own throwaway user profile, so it never
/// contends with a LibreOffice window the user already has open.
#[derive(Debug)]
pub struct SofficeApp {
    program: PathBuf,
    version: String,
    timeout: Duration,
    profile: Option<TempDir>,
}

/// A presentation accepted by [`SofficeApp::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SofficeDocument {
    path: PathBuf,
    format: PresentationFormat,
}

impl SofficeDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> PresentationFormat {
        self.format
    }
}

impl SofficeApp {
    /// Locate LibreOffice as configured and start it.
    pub fn launch(config: &SofficeConfig) -> Result<Self> {
        log::info!("Attempting to locate LibreOffice...");
        let program = Locator::from_env(config.program.as_deref()).find()?;
        Self::start(program, Duration::from_secs(config.timeout_secs.max(1)))
    }

    /// Start the given program, checking that it answers `--version`.
    pub fn start(program: PathBuf, timeout: Duration) -> Result<Self> {
        let profile = tempfile::Builder::new()
            .prefix("pptpdf-profile-")
            .tempdir()
            .map_err(|e| {
                Error::ApplicationUnavailable(format!(
                    "Failed to create a profile directory: {}",
                    e
                ))
            })?;

        let mut app = Self {
            program,
            version: String::new(),
            timeout,
            profile: Some(profile),
        };

        let mut probe = app.command()?;
        probe.arg("--version");
        let finished = run_with_timeout(&mut probe, PROBE_TIMEOUT).map_err(|e| {
            Error::ApplicationUnavailable(format!("{}: {}", app.program.display(), e))
        })?;
        if !finished.status.success() {
            return Err(Error::ApplicationUnavailable(format!(
                "{} exited with {}: {}",
                app.program.display(),
                finished.status,
                finished.diagnostics()
            )));
        }

        app.version = finished.stdout.trim().to_string();
        log::info!(
            "Started {} ({})",
            app.program.display(),
            if app.version.is_empty() { "unknown version" } else { app.version.as_str() }
        );
        Ok(app)
    }

    /// Path of the program in use.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Output of `soffice --version`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Base command with the private profile; fails once quit.
    fn command(&self) -> Result<Command> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| Error::backend("LibreOffice has already quit"))?;

        let mut command = Command::new(&self.program);
        command.args(["--headless", "--invisible", "--nologo", "--norestore", "--nolockcheck"]);
        command.arg(format!("-env:UserInstallation={}", file_url(profile.path())));
        Ok(command)
    }

    fn check_finished(&self, finished: &Finished, doc: &SofficeDocument) -> Result<()> {
        if finished.status.success() {
            return Ok(());
        }
        Err(Error::backend(format!(
            "soffice exited with {} for {}: {}",
            finished.status,
            doc.path.display(),
            finished.diagnostics()
        )))
    }
}

impl PresentationApp for SofficeApp {
    type Document = SofficeDocument;

    fn name(&self) -> &str {
        "LibreOffice"
    }

    fn open(&mut self, path: &Path) -> Result<SofficeDocument> {
        if self.profile.is_none() {
            return Err(Error::backend("LibreOffice has already quit"));
        }

        let mut head = Vec::with_capacity(8);
        File::open(path)?.take(8).read_to_end(&mut head)?;

        let format = PresentationFormat::from_magic(&head)
            .or_else(|| PresentationFormat::from_path(path))
            .ok_or_else(|| {
                Error::backend(format!("{} is not a PowerPoint file", path.display()))
            })?;

        log::debug!("Opened {} as {:?}", path.display(), format);
        Ok(SofficeDocument {
            path: path.to_path_buf(),
            format,
        })
    }

    fn export_pdf(&mut self, doc: &SofficeDocument, output: &Path) -> Result<()> {
        let target_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".pptpdf-")
            .tempdir_in(target_dir)?;

        let mut command = self.command()?;
        command
            .args(["--convert-to", PDF_FILTER, "--outdir"])
            .arg(staging.path())
            .arg(&doc.path);

        let finished = run_with_timeout(&mut command, self.timeout)?;
        self.check_finished(&finished, doc)?;

        let stem = doc
            .path
            .file_stem()
            .ok_or_else(|| Error::backend(format!("{} has no file name", doc.path.display())))?;
        // soffice swaps only the last extension, so `q3.review.pptx` becomes
        // `q3.review.pdf`.
        let mut produced_name = stem.to_os_string();
        produced_name.push(".pdf");
        let produced = staging.path().join(produced_name);
        if !produced.is_file() {
            return Err(Error::backend(format!(
                "soffice produced no PDF for {}: {}",
                doc.path.display(),
                finished.diagnostics()
            )));
        }

        // Replaces an existing output in one step; on failure the old PDF stays.
        fs::rename(&produced, output)?;
        Ok(())
    }

    fn close(&mut self, doc: SofficeDocument) -> Result<()> {
        log::debug!("Closed {}", doc.path.display());
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        match self.profile.take() {
            Some(profile) => profile
                .close()
                .map_err(|e| Error::backend(format!("Failed to remove profile: {}", e))),
            None => Ok(()),
        }
    }
}

/// `file://` URL for a local path, as LibreOffice expects for
/// `-env:UserInstallation`.
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut url = String::from(if raw.starts_with('/') { "file://" } else { "file:///" });
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{:02X}", byte)),
        }
    }
    url
}
