use std::fmt::{Display, Formatter};
use std::process::Stdio;

use crate::error::{Error, Result};

/// An executable name followed by its arguments.
///
/// Construction rejects an empty vector, so `program()` always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    arguments: Vec<String>,
}

impl CommandLine {
    /// # Errors
    ///
    /// Returns [`Error::EmptyCommand`] when no arguments are given or the
    /// executable name is blank.
    pub fn new<I, S>(arguments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arguments: Vec<String> = arguments.into_iter().map(Into::into).collect();

        match arguments.first() {
            Some(program) if !program.trim().is_empty() => Ok(Self { arguments }),
            _ => Err(Error::EmptyCommand),
        }
    }

    pub fn program(&self) -> &str {
        &self.arguments[0]
    }

    pub fn args(&self) -> &[String] {
        &self.arguments[1..]
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Builds a process command with both output streams piped.
    ///
    /// Stdin is inherited so interactive tools such as `vdb-config -i` can
    /// read from the terminal.
    pub(crate) fn to_piped_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(self.program());
        command
            .args(self.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Display for CommandLine {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.arguments.join(" ").as_str())
    }
}
