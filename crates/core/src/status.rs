//! The single-slot status line and the texts written to it.

use crate::command_line::CommandLine;

pub const READY: &str = "Ready";
pub const COMPLETED: &str = "Command completed successfully";
pub const TIMED_OUT: &str = "Error: Command timed out";
pub const FAILED: &str = "Error: Execution failed";
pub const CANCELED: &str = "Process canceled";
pub const NOTHING_RUNNING: &str = "No process is currently running";
pub const BATCH_RUNNING: &str = "Running batch prefetch...";
pub const BATCH_COMPLETED: &str = "Batch prefetch completed";

pub fn running(command: &CommandLine) -> String {
    format!("Running: {command}")
}

/// Anything that can show one line of status text.
pub trait StatusLine {
    fn set(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    text: String,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self {
            text: READY.to_string(),
        }
    }
}

impl StatusBar {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl StatusLine for StatusBar {
    fn set(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }
}
