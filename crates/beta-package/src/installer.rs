//! Bulk dependency installation and PATH checks.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Installs dependencies for every extension before packaging.
///
/// Runs to completion or fails; there is no partial result.
pub trait DependencyInstaller: Send + Sync {
    fn install(&self) -> Result<()>;
}

/// Build a shell [`Command`] that executes `cmd_str` via the system shell.
///
/// - Unix: `sh -c "{cmd_str}"`
/// - Windows: `cmd /C "{cmd_str}"`
fn shell_command(cmd_str: &str) -> Command {
    #[cfg(windows)]
    {
        let mut c = Command::new("cmd");
        c.args(["/C", cmd_str]);
        c
    }
    #[cfg(not(windows))]
    {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_str);
        c
    }
}

/// Runs a shell command (default `npm install`) from the monorepo root.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    command: String,
    working_dir: PathBuf,
}

impl CommandInstaller {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl DependencyInstaller for CommandInstaller {
    fn install(&self) -> Result<()> {
        tracing::debug!(command = %self.command, dir = %self.working_dir.display(), "installing dependencies");

        let status = shell_command(&self.command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.command.clone(),
                dir: self.working_dir.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::InstallFailed {
                command: self.command.clone(),
                exit_code: status.code(),
            });
        }

        Ok(())
    }
}

/// Resolve `tool` against `PATH`, or fail with an install hint.
pub fn check_binary_on_path(tool: &str) -> Result<PathBuf> {
    let search_path = std::env::var_os("PATH").unwrap_or_default();
    find_executable(tool, &search_path).ok_or_else(|| Error::BinaryNotFound {
        tool: tool.to_string(),
        hint: install_hint(tool).map(str::to_string),
    })
}

/// First `dir/tool` (plus `PATHEXT` suffixes on Windows) that is a file.
fn find_executable(tool: &str, search_path: &OsStr) -> Option<PathBuf> {
    let names = executable_names(tool);
    std::env::split_paths(search_path)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

#[cfg(windows)]
fn executable_names(tool: &str) -> Vec<String> {
    let pathext = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    pathext
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("{tool}{}", ext.to_ascii_lowercase()))
        .collect()
}

#[cfg(not(windows))]
fn executable_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}

fn install_hint(tool: &str) -> Option<&'static str> {
    match tool {
        "vsce" => Some("\n  Install: npm install -g vsce"),
        "npm" => Some("\n  Install: https://nodejs.org"),
        _ => None,
    }
}
