//! LibreOffice backend for PowerPoint to PDF conversion.
//!
//! Locates the `soffice` program, starts it headless with a private
//! profile, and converts presentations through its `--convert-to` mode.

pub mod app;
pub mod locate;
pub mod process;

pub use app::{SofficeApp, SofficeDocument};
pub use locate::{Locator, ENV_PROGRAM, TROUBLESHOOTING};
