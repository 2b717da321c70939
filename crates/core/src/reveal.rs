//! Open a folder in the platform file manager.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const OPENER: &str = "xdg-open";

/// Open `dir` in the file manager. Does not wait for it to exit.
pub fn open_folder(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let mut command = Command::new(OPENER);
    command.arg(dir);
    spawn_detached(command)?;
    Ok(())
}

/// Spawn `command` and reap it on a background thread so a long-lived
/// caller does not collect zombies.
fn spawn_detached(mut command: Command) -> Result<JoinHandle<()>> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::backend(format!("Could not run {}: {}", program, e)))?;

    Ok(thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => log::debug!("{} exited with {}", program, status),
        Ok(_) => {}
        Err(e) => log::debug!("Failed to wait for {}: {}", program, e),
    }))
}

/// Folder containing `path`, for revealing a single output file.
pub fn containing_folder(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
