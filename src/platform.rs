//! Host platform capabilities: opening URLs and running start scripts.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use tracing::debug;

use crate::error::Error;

/// Operations that depend on the host operating system.
pub trait Platform: Send + Sync {
    /// Start script names to look for, in priority order.
    fn start_scripts(&self) -> &'static [&'static str];

    /// Ask the desktop to open `url` with its default handler. Does not wait.
    fn open_url(&self, url: &str) -> Result<(), Error>;

    /// Run `script` (relative to `dir`) from inside `dir`, attached to the current
    /// terminal, and return its exit code. Blocks until the script exits.
    fn run_script(&self, dir: &Path, script: &Path) -> Result<i32, Error>;
}

/// Platform implementation for the OS this binary was built for.
#[derive(Debug, Default, Clone, Copy)]
pub struct Native;

/// Select the native platform at startup.
pub fn native() -> Arc<dyn Platform> {
    Arc::new(Native)
}

impl Platform for Native {
    fn start_scripts(&self) -> &'static [&'static str] {
        imp::START_SCRIPTS
    }

    fn open_url(&self, url: &str) -> Result<(), Error> {
        let mut command = imp::open_command(url);
        debug!(?command, "Opening browser");
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }

    fn run_script(&self, dir: &Path, script: &Path) -> Result<i32, Error> {
        let mut command = imp::script_command(dir, script)?;
        debug!(?command, dir = %dir.display(), "Running start script");
        let status = command
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(exit_code(status))
    }
}

// =============================================================================
// Windows
// =============================================================================

#[cfg(windows)]
mod imp {
    use super::*;

    pub const START_SCRIPTS: &[&str] = &["start.ps1", "start.bat"];

    pub fn open_command(url: &str) -> Command {
        let mut command = Command::new("rundll32");
        command.args(["url.dll,FileProtocolHandler", url]);
        command
    }

    pub fn script_command(_dir: &Path, script: &Path) -> Result<Command, Error> {
        let is_powershell = script
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ps1"));

        let command = if is_powershell {
            let mut command = Command::new("powershell");
            command
                .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"])
                .arg(script);
            command
        } else {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(script);
            command
        };
        Ok(command)
    }
}

// =============================================================================
// Unix (macOS, Linux, BSD)
// =============================================================================

#[cfg(not(windows))]
mod imp {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    pub const START_SCRIPTS: &[&str] = &["start.sh"];

    pub fn open_command(url: &str) -> Command {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        let mut command = Command::new(program);
        command.arg(url);
        command
    }

    pub fn script_command(dir: &Path, script: &Path) -> Result<Command, Error> {
        let mode = std::fs::metadata(dir.join(script))?.permissions().mode();

        // Archives often drop the executable bit.
        if mode & 0o111 != 0 {
            Ok(Command::new(script))
        } else {
            let mut command = Command::new("sh");
            command.arg(script);
            Ok(command)
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
