//! Logger setup shared by the front ends.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Initialize `env_logger`.
///
/// Lines look like `<timestamp> - <LEVEL> - <message>`. The default filter
/// is `info` (`debug` when `verbose`), overridable through `RUST_LOG`. With
/// a `log_file` the output is appended to it, otherwise it goes to stderr.
/// Calling this again after a logger is installed does nothing.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            buf.timestamp(),
            record.level(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
    Ok(())
}
