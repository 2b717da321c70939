//! Conversion contract, error taxonomy, configuration and the batch driver
//! for turning PowerPoint presentations into PDFs.

pub mod backend;
pub mod config;
pub mod converter;
pub mod error;
pub mod logging;
pub mod progress;
pub mod reveal;
pub mod types;

pub use backend::PresentationApp;
pub use config::{Config, SofficeConfig};
pub use converter::Converter;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use progress::{Progress, Silent};
pub use types::{BatchReport, BatchSummary, FileOutcome, PresentationFormat};
