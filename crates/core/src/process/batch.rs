//! Sequential run-to-completion of a list of commands.
//!
//! Batches bypass the streaming runner and its slot entirely. Each item's
//! output is captured whole and appended once the item finishes; a failing
//! item is reported and the batch moves on.

use log::{error, info, warn};
use tokio::task::JoinHandle;

use crate::command_line::CommandLine;
use crate::event::{Event, EventSender, SinkId};
use crate::status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub label: String,
    pub command: CommandLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemResult {
    Finished { exit_code: Option<i32> },
    SpawnFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<(String, ItemResult)>,
}

impl BatchReport {
    /// Labels of items that could not be started.
    pub fn spawn_failures(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter_map(|(label, result)| match result {
            ItemResult::SpawnFailed(_) => Some(label.as_str()),
            ItemResult::Finished { .. } => None,
        })
    }
}

pub fn spawn_batch(items: Vec<BatchItem>, sink: SinkId, events: EventSender) -> JoinHandle<BatchReport> {
    tokio::spawn(run_batch(items, sink, events))
}

pub async fn run_batch(items: Vec<BatchItem>, sink: SinkId, events: EventSender) -> BatchReport {
    events.status(status::BATCH_RUNNING);
    events.busy(true);

    let mut report = BatchReport::default();

    for BatchItem { label, command } in items {
        let program = command.program().to_string();
        events.append(sink, format!("\nRunning {program} for {label}\n"));
        info!("Batch item {label}: {command}");

        let result = match command.to_piped_command().output().await {
            Ok(output) => {
                events.append(sink, String::from_utf8_lossy(&output.stdout));
                if !output.stderr.is_empty() {
                    events.append_error(
                        sink,
                        format!("Errors:\n{}", String::from_utf8_lossy(&output.stderr)),
                    );
                }
                if !output.status.success() {
                    warn!("Batch item {label} exited with {}", output.status);
                }
                ItemResult::Finished {
                    exit_code: output.status.code(),
                }
            }
            Err(e) => {
                error!("Error running {program} for {label}: {e}");
                events.append_error(sink, format!("Error running {program} for {label}: {e}\n"));
                ItemResult::SpawnFailed(e.to_string())
            }
        };

        events.send(Event::ScrollToEnd(sink));
        report.results.push((label, result));
    }

    events.busy(false);
    events.status(status::BATCH_COMPLETED);
    info!("Batch finished with {} item(s)", report.results.len());

    report
}
