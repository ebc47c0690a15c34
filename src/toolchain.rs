//! External project tooling: lockfile regeneration and the import check.
//! Both are black boxes; only the exit status is inspected.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::constants::MODULE_PLACEHOLDER;
use crate::error::{Error, Result};

/// Commands the initializer delegates to the project's own toolchain.
pub trait Toolchain {
    /// Regenerates the dependency lockfile from the project metadata.
    fn regenerate_lockfile(&self, root: &Path) -> Result<()>;
    /// Attempts to import `module` with the project's runtime.
    fn verify_importable(&self, root: &Path, module: &str) -> Result<()>;
}

/// Runs configured command lines in the project root.
pub struct CommandToolchain {
    lock_command: Vec<String>,
    import_command: Vec<String>,
}

impl CommandToolchain {
    /// `import_command` may contain `{module}`, replaced by the module name in every argument.
    pub fn new(lock_command: Vec<String>, import_command: Vec<String>) -> Self {
        Self { lock_command, import_command }
    }

}

impl Toolchain for CommandToolchain {
    fn regenerate_lockfile(&self, root: &Path) -> Result<()> {
        run_command(root, &self.lock_command)
    }

    fn verify_importable(&self, root: &Path, module: &str) -> Result<()> {
        run_command(root, &with_module(&self.import_command, module))
    }
}

/// Replaces `{module}` in every argument of `command`.
pub fn with_module(command: &[String], module: &str) -> Vec<String> {
    command.iter().map(|arg| arg.replace(MODULE_PLACEHOLDER, module)).collect()
}

/// Runs `command` in `root` with captured output.
///
/// # Errors
/// * `Error::CommandFailed` when the command is empty, cannot be spawned or exits unsuccessfully
pub fn run_command(root: &Path, command: &[String]) -> Result<()> {
    let line = command.join(" ");
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::CommandFailed { command: line.clone(), reason: "empty command".to_string() })?;

    debug!("Running '{}' in {}", line, root.display());
    let output = Command::new(program)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::CommandFailed { command: line.clone(), reason: e.to_string() })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(last) => format!("{}: {}", output.status, last.trim()),
            None => output.status.to_string(),
        };
        return Err(Error::CommandFailed { command: line, reason });
    }
    Ok(())
}
