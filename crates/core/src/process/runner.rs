//! Streams a single external process into the display sinks.
//!
//! `start` reserves the slot, spawns the child and hands it to a background
//! task. That task waits on stdout, stderr, process exit, the timeout and kill
//! requests at once, forwarding every line as an [`Event`]. Within one stream
//! lines keep their order; across streams stdout wins ties, so the relative
//! interleaving of stdout and stderr is best-effort.

use std::io;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::time::{sleep_until, timeout, Instant};

use crate::command_line::CommandLine;
use crate::config::{describe_duration, RunnerConfig};
use crate::error::{Error, Result};
use crate::event::{Event, EventSender, Outcome, RunTargets};
use crate::process::cancel::CancellationController;
use crate::process::slot::{KillReply, ProcessInfo, ProcessSlot, RunId};
use crate::status;

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    slot: ProcessSlot,
    events: EventSender,
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(events: EventSender, config: RunnerConfig) -> Self {
        Self {
            slot: ProcessSlot::default(),
            events,
            config,
        }
    }

    /// A controller sharing this runner's slot.
    pub fn controller(&self) -> CancellationController {
        CancellationController::new(self.slot.clone(), self.events.clone())
    }

    pub fn events(&self) -> &EventSender {
        &self.events
    }

    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    pub fn is_idle(&self) -> bool {
        !self.slot.is_occupied()
    }

    pub fn current(&self) -> Option<ProcessInfo> {
        self.slot.current()
    }

    /// Spawns `command` and returns without waiting for it.
    ///
    /// Must be called from within a tokio runtime. Spawn failures are not
    /// returned: like every other run failure they are reported through the
    /// sinks and the status line, and the slot is freed again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] if another process is still tracked.
    pub fn start(&self, command: CommandLine, targets: RunTargets) -> Result<RunId> {
        let (id, kill_requests) = self.slot.claim(&command, targets)?;
        let command_text = command.to_string();

        let run = Run {
            id,
            command_text,
            targets,
            events: self.events.clone(),
            slot: self.slot.clone(),
            config: self.config,
        };
        run.announce(&command);

        info!("Executing command: {}", run.command_text);
        let child = match command.to_piped_command().kill_on_drop(true).spawn() {
            Ok(child) => child,
            Err(e) => {
                let message = Error::spawn_error(command.program(), e).to_string();
                error!("Error during command execution: {message}");
                run.report_exception(&message);
                run.cleanup(Outcome::Failed(message));
                return Ok(id);
            }
        };

        let started_at = Instant::now();
        self.slot.record_spawn(id, child.id(), started_at);
        debug!("Run {id} spawned with pid {:?}", child.id());

        tokio::spawn(run.drive(child, kill_requests, started_at));

        Ok(id)
    }
}

/// Everything the background task needs to report on one run.
struct Run {
    id: RunId,
    command_text: String,
    targets: RunTargets,
    events: EventSender,
    slot: ProcessSlot,
    config: RunnerConfig,
}

impl Run {
    fn announce(&self, command: &CommandLine) {
        let output = self.targets.output;

        self.events.send(Event::Clear(output));
        if let Some(progress) = self.targets.progress {
            self.events.send(Event::Clear(progress));
            self.events
                .append(progress, format!("Starting command: {}\n", self.command_text));
        }
        self.events.status(status::running(command));
        self.events
            .append(output, format!("Running command: {}\n\n", self.command_text));
        self.events.busy(true);
    }

    async fn drive(
        self,
        mut child: Child,
        kill_requests: oneshot::Receiver<KillReply>,
        started_at: Instant,
    ) {
        let outcome = match self.pump(&mut child, kill_requests, started_at).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                error!("Error during command execution: {message}");
                self.report_exception(&message);
                Outcome::Failed(message)
            }
        };

        self.cleanup(outcome);
    }

    async fn pump(
        &self,
        child: &mut Child,
        mut kill_requests: oneshot::Receiver<KillReply>,
        started_at: Instant,
    ) -> io::Result<Outcome> {
        let mut stdout = BufReader::new(
            child
                .stdout
                .take()
                .ok_or_else(|| io::Error::other("stdout was not captured"))?,
        );
        let mut stderr = BufReader::new(
            child
                .stderr
                .take()
                .ok_or_else(|| io::Error::other("stderr was not captured"))?,
        );

        // read_until keeps partial bytes in these buffers when another branch wins
        let mut stdout_line = Vec::new();
        let mut stderr_line = Vec::new();
        let mut stdout_open = true;
        let mut stderr_open = true;
        let mut kill_armed = true;
        let mut canceled = false;

        let deadline = sleep_until(started_at + self.config.timeout);
        tokio::pin!(deadline);

        let exit_status = loop {
            tokio::select! {
                biased;

                request = &mut kill_requests, if kill_armed => {
                    kill_armed = false;
                    if let Ok(reply) = request {
                        let result = child.kill().await;
                        canceled = result.is_ok();
                        let _ = reply.send(result);
                    }
                }

                () = &mut deadline, if !canceled => {
                    // An exit that raced the deadline still counts as an exit
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                    if let Err(e) = child.kill().await {
                        warn!("Failed to kill timed out process: {e}");
                    }
                    self.report_timeout();
                    return Ok(Outcome::TimedOut);
                }

                read = stdout.read_until(b'\n', &mut stdout_line), if stdout_open => {
                    if read? == 0 {
                        stdout_open = false;
                    }
                    if !stdout_line.is_empty() {
                        self.forward_stdout(&take_text(&mut stdout_line));
                    }
                }

                read = stderr.read_until(b'\n', &mut stderr_line), if stderr_open => {
                    if read? == 0 {
                        stderr_open = false;
                    }
                    if !stderr_line.is_empty() {
                        self.forward_stderr(&take_text(&mut stderr_line));
                    }
                }

                status = child.wait() => break status?,
            }
        };

        let (stdout_rest, stderr_rest) = tokio::join!(
            self.remainder(&mut stdout, stdout_line, stdout_open),
            self.remainder(&mut stderr, stderr_line, stderr_open),
        );
        self.flush_remainder(&stdout_rest?, &stderr_rest?);

        let exit_code = exit_status.code();
        info!(
            "Command `{}` exited with {exit_status} after {:?}",
            self.command_text,
            started_at.elapsed()
        );
        if !exit_status.success() {
            // Completion is judged by stream state, not by the exit code
            warn!("Command `{}` reported failure: {exit_status}", self.command_text);
        }

        if canceled {
            return Ok(Outcome::Canceled);
        }

        self.events.status(status::COMPLETED);
        info!("Command completed successfully");
        if let Some(progress) = self.targets.progress {
            self.events
                .append(progress, "Command completed successfully.\n");
        }

        Ok(Outcome::Completed { exit_code })
    }

    /// Whatever is still buffered or in the pipe once the process is gone.
    async fn remainder<R: AsyncRead + Unpin>(
        &self,
        reader: &mut BufReader<R>,
        mut pending: Vec<u8>,
        open: bool,
    ) -> io::Result<String> {
        if open {
            match timeout(self.config.remainder_grace, reader.read_to_end(&mut pending)).await {
                Ok(result) => {
                    result?;
                }
                Err(_) => warn!(
                    "Output pipe of `{}` still open after exit, keeping what was read",
                    self.command_text
                ),
            }
        }

        Ok(String::from_utf8_lossy(&pending).into_owned())
    }

    fn forward_stdout(&self, line: &str) {
        let output = self.targets.output;
        self.events.append(output, line);
        self.events.send(Event::ScrollToEnd(output));

        if let Some(progress) = self.targets.progress {
            self.events.append(progress, format!("[OUTPUT] {line}"));
            self.events.send(Event::ScrollToEnd(progress));
        }
    }

    fn forward_stderr(&self, line: &str) {
        self.events.append_error(self.targets.output, line);

        if let Some(progress) = self.targets.progress {
            self.events.append(progress, format!("[ERROR] {line}"));
        }
    }

    fn flush_remainder(&self, stdout_rest: &str, stderr_rest: &str) {
        if !stdout_rest.is_empty() {
            self.events.append(self.targets.output, stdout_rest);
            if let Some(progress) = self.targets.progress {
                self.events
                    .append(progress, format!("[OUTPUT] {}", terminated(stdout_rest)));
            }
        }

        if !stderr_rest.is_empty() {
            self.events
                .append_error(self.targets.output, format!("Errors:\n{stderr_rest}"));
            if let Some(progress) = self.targets.progress {
                self.events
                    .append(progress, format!("[ERROR] {}", terminated(stderr_rest)));
            }
        }
    }

    fn report_timeout(&self) {
        error!("Command timed out");
        self.events.append_error(
            self.targets.output,
            format!(
                "Error: Command timed out after {}\n",
                describe_duration(self.config.timeout)
            ),
        );
        self.events.status(status::TIMED_OUT);
        if let Some(progress) = self.targets.progress {
            self.events.append(progress, "Command timed out.\n");
        }
    }

    fn report_exception(&self, message: &str) {
        self.events
            .append_error(self.targets.output, format!("Error: {message}\n"));
        self.events.status(status::FAILED);
        if let Some(progress) = self.targets.progress {
            self.events
                .append(progress, format!("[EXCEPTION] {message}\n"));
        }
    }

    fn cleanup(&self, outcome: Outcome) {
        if !self.slot.release(self.id) {
            debug!("Run {} was already released", self.id);
        }

        self.events.send(Event::Finished {
            run: self.id,
            outcome,
        });

        // Once a newer run holds the slot, the display is its to update
        let output = self.targets.output;
        let idle = self.slot.if_idle(|| {
            // Jumps back to the top of the output, unlike the scroll-to-end while streaming
            self.events.send(Event::ScrollToStart(output));
            self.events.busy(false);
        });
        if !idle {
            debug!("Run {} finished after a newer run started", self.id);
        }
    }
}

fn take_text(buffer: &mut Vec<u8>) -> String {
    let bytes = std::mem::take(buffer);
    terminated(&String::from_utf8_lossy(&bytes)).into_owned()
}

fn terminated(text: &str) -> std::borrow::Cow<'_, str> {
    if text.ends_with('\n') {
        std::borrow::Cow::Borrowed(text)
    } else {
        std::borrow::Cow::Owned(format!("{text}\n"))
    }
}
