//! State machine behind the terminal form.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use pptpdf_core::reveal::{containing_folder, open_folder};
use pptpdf_core::types::default_pdf_path;
use pptpdf_core::{Converter, PresentationApp, Silent};
use ratatui::crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::keys::{map_key, KeyAction};
use super::ui;

pub const ACTIONS: [&str; 2] = ["Convert Single PPTX File", "Convert All PPTX in Folder"];

pub const READY: &str = "Ready. Select an action.";

/// Opens a folder in the file manager.
pub type FolderOpener = fn(&Path) -> pptpdf_core::Result<()>;

/// Which path the form is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    SingleInput,
    SingleOutput { input: PathBuf },
    BatchInput,
    BatchOutput { input_dir: PathBuf },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SingleInput => "Select PowerPoint File",
            Self::SingleOutput { .. } => "Save PDF As",
            Self::BatchInput => "Select Input Folder with PPTX Files",
            Self::BatchOutput { .. } => "Select Output Folder for PDFs",
        }
    }
}

/// Conversion waiting to run once the busy status has been drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Single { input: PathBuf, output: PathBuf },
    Batch { input_dir: PathBuf, output_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupKind {
    /// Success; `y` opens this folder.
    OfferOpen(PathBuf),
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub kind: PopupKind,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Input(Prompt),
    Busy(Job),
    Popup(Popup),
}

pub struct App<A: PresentationApp> {
    converter: Converter<A>,
    opener: FolderOpener,
    log_hint: String,
    pub mode: Mode,
    pub selected: usize,
    pub status: String,
    pub input_buffer: String,
    pub should_quit: bool,
}

impl<A: PresentationApp> App<A> {
    pub fn new(converter: Converter<A>, log_hint: impl Into<String>) -> Self {
        Self {
            converter,
            opener: open_folder,
            log_hint: log_hint.into(),
            mode: Mode::Menu,
            selected: 0,
            status: READY.to_string(),
            input_buffer: String::new(),
            should_quit: false,
        }
    }

    #[cfg(test)]
    pub fn with_opener(mut self, opener: FolderOpener) -> Self {
        self.opener = opener;
        self
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.mode, Mode::Busy(_))
    }

    /// Run the form until the user quits, then close the converter.
    ///
    /// Returns a cleanup warning if the application could not be closed.
    pub fn run(mut self) -> Result<Option<String>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

        result?;
        Ok(self.shutdown())
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if self.is_busy() {
                self.run_pending();
                discard_typeahead(|| event::poll(Duration::ZERO), event::read)?;
                continue;
            }

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let input_active = matches!(self.mode, Mode::Input(_));
                        self.handle_action(map_key(key, input_active));
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Close the converter. A failure becomes a cleanup warning.
    pub fn shutdown(&mut self) -> Option<String> {
        log::info!("Close requested, closing converter");
        self.converter
            .close()
            .err()
            .map(|e| format!("Could not fully close resources: {}", e))
    }

    pub fn handle_action(&mut self, action: KeyAction) {
        if action == KeyAction::Quit && !self.is_busy() {
            self.should_quit = true;
            return;
        }

        match self.mode.clone() {
            Mode::Menu => self.handle_menu_action(action),
            Mode::Input(prompt) => self.handle_input_action(prompt, action),
            Mode::Popup(popup) => self.handle_popup_action(popup, action),
            Mode::Busy(_) => {}
        }
    }

    fn handle_menu_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::MoveUp => {
                self.selected = self.selected.checked_sub(1).unwrap_or(ACTIONS.len() - 1);
            }
            KeyAction::MoveDown => self.selected = (self.selected + 1) % ACTIONS.len(),
            KeyAction::Choose(idx) if idx < ACTIONS.len() => {
                self.selected = idx;
                self.start_action();
            }
            KeyAction::Submit => self.start_action(),
            _ => {}
        }
    }

    fn start_action(&mut self) {
        if self.selected == 0 {
            self.status = "Select the PowerPoint file to convert.".to_string();
            self.ask(Prompt::SingleInput, String::new());
        } else {
            self.status = "Select the FOLDER containing PowerPoint files...".to_string();
            self.ask(Prompt::BatchInput, String::new());
        }
    }

    fn ask(&mut self, prompt: Prompt, prefill: String) {
        self.input_buffer = prefill;
        self.mode = Mode::Input(prompt);
    }

    fn handle_input_action(&mut self, prompt: Prompt, action: KeyAction) {
        match action {
            KeyAction::InputChar(c) => self.input_buffer.push(c),
            KeyAction::Backspace => {
                self.input_buffer.pop();
            }
            KeyAction::ClearInput => self.input_buffer.clear(),
            KeyAction::Dismiss => self.cancel(&prompt),
            KeyAction::Submit => {
                let answer = self.input_buffer.trim().to_string();
                if answer.is_empty() {
                    self.cancel(&prompt);
                } else {
                    self.submit(prompt, PathBuf::from(answer));
                }
            }
            _ => {}
        }
    }

    fn cancel(&mut self, prompt: &Prompt) {
        self.input_buffer.clear();
        self.mode = Mode::Menu;
        self.status = match prompt {
            Prompt::SingleOutput { .. } => "Operation cancelled. Ready.",
            _ => "Operation cancelled.",
        }
        .to_string();
    }

    fn submit(&mut self, prompt: Prompt, path: PathBuf) {
        match prompt {
            Prompt::SingleInput => {
                self.status = "Select where to save the PDF...".to_string();
                let suggested = default_pdf_path(&path).display().to_string();
                self.ask(Prompt::SingleOutput { input: path }, suggested);
            }
            Prompt::SingleOutput { input } => {
                self.status = format!("Converting {}...", display_name(&input));
                self.input_buffer.clear();
                self.mode = Mode::Busy(Job::Single {
                    input,
                    output: path,
                });
            }
            Prompt::BatchInput => {
                self.status = "Select the FOLDER to save the PDF files...".to_string();
                self.ask(Prompt::BatchOutput { input_dir: path }, String::new());
            }
            Prompt::BatchOutput { input_dir } => {
                self.status =
                    format!("Starting batch conversion in {}...", display_name(&input_dir));
                self.input_buffer.clear();
                self.mode = Mode::Busy(Job::Batch {
                    input_dir,
                    output_dir: path,
                });
            }
        }
    }

    /// Run the queued conversion, blocking until the application is done.
    pub fn run_pending(&mut self) {
        let Mode::Busy(job) = self.mode.clone() else {
            return;
        };

        self.mode = match job {
            Job::Single { input, output } => self.run_single(&input, &output),
            Job::Batch {
                input_dir,
                output_dir,
            } => self.run_batch(&input_dir, &output_dir),
        };
    }

    fn run_single(&mut self, input: &Path, output: &Path) -> Mode {
        match self.converter.convert_single_file(input, Some(output), true) {
            Ok(pdf) => {
                self.status = format!("Success! PDF saved to: {}", pdf.display());
                Mode::Popup(Popup {
                    kind: PopupKind::OfferOpen(containing_folder(&pdf).to_path_buf()),
                    title: "Success".to_string(),
                    body: format!(
                        "Conversion successful!\nPDF saved to:\n{}\n\n\
                         Open the output folder? (y/n)",
                        pdf.display()
                    ),
                })
            }
            Err(e) => {
                self.status = format!("Conversion failed. Check {} for details.", self.log_hint);
                Mode::Popup(Popup {
                    kind: PopupKind::Error,
                    title: "Conversion Failed".to_string(),
                    body: format!(
                        "Could not convert the file.\n{}\n\nPlease check {} for more information.",
                        e, self.log_hint
                    ),
                })
            }
        }
    }

    fn run_batch(&mut self, input_dir: &Path, output_dir: &Path) -> Mode {
        match self
            .converter
            .batch_convert(input_dir, Some(output_dir), true, &mut Silent)
        {
            Ok(report) => {
                self.status = format!(
                    "Batch conversion completed for folder: {} ({}/{} converted)",
                    display_name(input_dir),
                    report.succeeded(),
                    report.total
                );
                let mut body = format!(
                    "Batch conversion complete!\n{}/{} files converted.\nPDFs saved in:\n{}\n",
                    report.succeeded(),
                    report.total,
                    report.output_dir.display()
                );
                if report.failed() > 0 {
                    body.push_str(&format!(
                        "{} file(s) failed, see {}.\n",
                        report.failed(),
                        self.log_hint
                    ));
                }
                body.push_str("\nOpen the output folder? (y/n)");
                Mode::Popup(Popup {
                    kind: PopupKind::OfferOpen(report.output_dir.clone()),
                    title: "Success".to_string(),
                    body,
                })
            }
            Err(e) => {
                self.status = format!(
                    "Batch conversion failed. Check {} for details.",
                    self.log_hint
                );
                Mode::Popup(Popup {
                    kind: PopupKind::Error,
                    title: "Conversion Failed".to_string(),
                    body: format!(
                        "Batch conversion failed.\n{}\n\nPlease check {} for more information.",
                        e, self.log_hint
                    ),
                })
            }
        }
    }

    fn handle_popup_action(&mut self, popup: Popup, action: KeyAction) {
        match (&popup.kind, action) {
            (PopupKind::OfferOpen(folder), KeyAction::Yes | KeyAction::Submit) => {
                self.mode = Mode::Menu;
                if let Err(e) = (self.opener)(folder) {
                    log::warn!("Could not open {}: {}", folder.display(), e);
                    self.status = format!("Converted, but could not open folder: {}", e);
                    self.mode = Mode::Popup(Popup {
                        kind: PopupKind::Warning,
                        title: "Warning".to_string(),
                        body: format!("Could not open the output folder:\n{}", e),
                    });
                }
            }
            (PopupKind::OfferOpen(_), KeyAction::No | KeyAction::Dismiss) => {
                self.mode = Mode::Menu;
            }
            (PopupKind::Error, action) if closes_popup(action) => {
                self.mode = Mode::Menu;
                self.status = READY.to_string();
            }
            (PopupKind::Warning, action) if closes_popup(action) => {
                self.mode = Mode::Menu;
            }
            _ => {}
        }
    }
}

fn closes_popup(action: KeyAction) -> bool {
    matches!(
        action,
        KeyAction::Submit | KeyAction::Dismiss | KeyAction::Yes | KeyAction::No
    )
}

/// Drop input that piled up while a conversion blocked the loop, so it is
/// not applied to the result popup unseen. Returns how many events were
/// dropped.
fn discard_typeahead<P, R>(mut pending: P, mut read: R) -> io::Result<usize>
where
    P: FnMut() -> io::Result<bool>,
    R: FnMut() -> io::Result<Event>,
{
    let mut dropped = 0;
    while pending()? {
        read()?;
        dropped += 1;
    }
    Ok(dropped)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
