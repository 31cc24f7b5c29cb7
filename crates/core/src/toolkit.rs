//! Startup check that the external toolkit can be launched at all.

use log::{debug, error};

use crate::command_line::CommandLine;
use crate::config::TOOLKIT_CHECK;
use crate::error::{Error, Result};

/// Runs the standard check (`vdb-config --version`).
///
/// # Errors
///
/// Returns [`Error::ToolkitNotFound`] when the check command cannot be spawned.
pub async fn ensure_installed() -> Result<()> {
    ensure_spawnable(&CommandLine::new(TOOLKIT_CHECK.iter().copied())?).await
}

/// Only a spawn failure counts; the check command's exit status and output are ignored.
pub async fn ensure_spawnable(check: &CommandLine) -> Result<()> {
    match check.to_piped_command().output().await {
        Ok(output) => {
            debug!(
                "Toolkit check `{check}` answered: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            Ok(())
        }
        Err(e) => {
            error!("Toolkit check `{check}` failed: {e}");
            Err(Error::ToolkitNotFound(format!("{}: {e}", check.program())))
        }
    }
}
