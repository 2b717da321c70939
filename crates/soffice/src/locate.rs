//! Finding the LibreOffice program on this machine.

use pptpdf_core::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the `soffice` program explicitly.
pub const ENV_PROGRAM: &str = "PPTPDF_SOFFICE";

/// Hints shown when the application cannot be found or started.
pub const TROUBLESHOOTING: &[&str] = &[
    "Verify LibreOffice is installed",
    "Check that LibreOffice works by opening it manually",
    "Point to the program explicitly with --soffice or the PPTPDF_SOFFICE variable",
];

#[cfg(windows)]
const PROGRAM_NAMES: &[&str] = &["soffice.exe", "soffice.com"];
#[cfg(not(windows))]
const PROGRAM_NAMES: &[&str] = &["soffice", "libreoffice"];

/// Install locations checked after `PATH`.
fn default_fallbacks() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if cfg!(target_os = "macos") {
        paths.push(PathBuf::from(
            "/Applications/LibreOffice.app/Contents/MacOS/soffice",
        ));
    } else if cfg!(windows) {
        for var in ["ProgramFiles", "ProgramFiles(x86)"] {
            if let Some(dir) = std::env::var_os(var) {
                paths.push(
                    PathBuf::from(dir)
                        .join("LibreOffice")
                        .join("program")
                        .join("soffice.exe"),
                );
            }
        }
    } else {
        paths.extend(
            [
                "/usr/bin/soffice",
                "/usr/lib/libreoffice/program/soffice",
                "/opt/libreoffice/program/soffice",
                "/snap/bin/libreoffice",
            ]
            .into_iter()
            .map(PathBuf::from),
        );
    }

    paths
}

/// Search order for the `soffice` program.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    /// Configured program path; wins over everything else.
    pub explicit: Option<PathBuf>,
    /// Value of [`ENV_PROGRAM`].
    pub env_program: Option<OsString>,
    /// Value of `PATH`.
    pub path_var: Option<OsString>,
    /// Well-known install locations.
    pub fallbacks: Vec<PathBuf>,
}

impl Locator {
    /// Locator reading the process environment.
    pub fn from_env(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            env_program: std::env::var_os(ENV_PROGRAM).filter(|v| !v.is_empty()),
            path_var: std::env::var_os("PATH"),
            fallbacks: default_fallbacks(),
        }
    }

    /// Find the program.
    ///
    /// An explicit or environment-provided path that is not an executable
    /// file is an error rather than a reason to keep searching.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(program) = &self.explicit {
            return require_executable(program, "configured");
        }
        if let Some(program) = &self.env_program {
            return require_executable(Path::new(program), ENV_PROGRAM);
        }

        if let Some(path_var) = &self.path_var {
            for dir in std::env::split_paths(path_var) {
                for name in PROGRAM_NAMES {
                    let candidate = dir.join(name);
                    if is_executable(&candidate) {
                        log::debug!("Found {} on PATH", candidate.display());
                        return Ok(candidate);
                    }
                }
            }
        }

        self.fallbacks
            .iter()
            .find(|candidate| is_executable(candidate))
            .cloned()
            .ok_or_else(|| {
                Error::ApplicationUnavailable(
                    "LibreOffice (soffice) was not found on PATH or in the usual install locations"
                        .to_string(),
                )
            })
    }
}

fn require_executable(program: &Path, source: &str) -> Result<PathBuf> {
    if is_executable(program) {
        Ok(program.to_path_buf())
    } else {
        Err(Error::ApplicationUnavailable(format!(
            "{} program {} is not an executable file",
            source,
            program.display()
        )))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn program(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_explicit_wins() {
        let tmp = TempDir::new().unwrap();
        let explicit = program(tmp.path(), "my-soffice", 0o755);
        let on_path = TempDir::new().unwrap();
        program(on_path.path(), "soffice", 0o755);

        let locator = Locator {
            explicit: Some(explicit.clone()),
            path_var: Some(on_path.path().as_os_str().to_owned()),
            ..Default::default()
        };
        assert_eq!(locator.find().unwrap(), explicit);
    }

    #[test]
    fn test_explicit_not_executable_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let explicit = program(tmp.path(), "soffice", 0o644);

        let locator = Locator {
            explicit: Some(explicit),
            ..Default::default()
        };
        assert!(matches!(
            locator.find().unwrap_err(),
            Error::ApplicationUnavailable(_)
        ));
    }

    #[test]
    fn test_env_program_before_path() {
        let tmp = TempDir::new().unwrap();
        let from_env = program(tmp.path(), "lo", 0o755);
        let on_path = TempDir::new().unwrap();
        program(on_path.path(), "soffice", 0o755);

        let locator = Locator {
            env_program: Some(from_env.as_os_str().to_owned()),
            path_var: Some(on_path.path().as_os_str().to_owned()),
            ..Default::default()
        };
        assert_eq!(locator.find().unwrap(), from_env);
    }

    #[test]
    fn test_searches_path_then_fallbacks() {
        let empty = TempDir::new().unwrap();
        let with_libreoffice = TempDir::new().unwrap();
        let found = program(with_libreoffice.path(), "libreoffice", 0o755);
        let path_var =
            std::env::join_paths([empty.path(), with_libreoffice.path()]).unwrap();

        let locator = Locator {
            path_var: Some(path_var),
            ..Default::default()
        };
        assert_eq!(locator.find().unwrap(), found);

        let fallback_dir = TempDir::new().unwrap();
        let fallback = program(fallback_dir.path(), "soffice", 0o755);
        let locator = Locator {
            path_var: Some(empty.path().as_os_str().to_owned()),
            fallbacks: vec![empty.path().join("soffice"), fallback.clone()],
            ..Default::default()
        };
        assert_eq!(locator.find().unwrap(), fallback);
    }

    #[test]
    fn test_nothing_found() {
        let empty = TempDir::new().unwrap();
        let locator = Locator {
            path_var: Some(empty.path().as_os_str().to_owned()),
            ..Default::default()
        };
        assert!(matches!(
            locator.find().unwrap_err(),
            Error::ApplicationUnavailable(_)
        ));
    }
}
