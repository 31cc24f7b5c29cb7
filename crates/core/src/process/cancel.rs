use log::{debug, error, info};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::event::EventSender;
use crate::process::slot::{ProcessSlot, RunningProcess};
use crate::status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    /// Nothing was tracked. Informational, not a failure.
    NotRunning,
}

impl CancelOutcome {
    pub fn message(self) -> &'static str {
        match self {
            CancelOutcome::Canceled => status::CANCELED,
            CancelOutcome::NotRunning => status::NOTHING_RUNNING,
        }
    }
}

/// Forcibly stops whatever process the shared slot tracks.
#[derive(Debug, Clone)]
pub struct CancellationController {
    slot: ProcessSlot,
    events: EventSender,
}

impl CancellationController {
    pub(crate) fn new(slot: ProcessSlot, events: EventSender) -> Self {
        Self { slot, events }
    }

    /// Kills the tracked process, if any.
    ///
    /// The slot is emptied before the kill is attempted, so bookkeeping is
    /// cleared even when the kill itself fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Kill`] if the operating system refused to kill the
    /// process.
    pub async fn cancel(&self) -> Result<CancelOutcome> {
        let Some(RunningProcess { info, kill }) = self.slot.take() else {
            info!("{}", status::NOTHING_RUNNING);
            return Ok(CancelOutcome::NotRunning);
        };

        let (reply, result) = oneshot::channel();
        let result = match kill.send(reply) {
            Ok(()) => result.await.ok(),
            Err(_) => None,
        };

        match result {
            Some(Ok(())) => {
                info!("Process canceled by user: {} (run {})", info.command, info.id);
                // A run started while the kill was pending keeps its own status
                self.slot.if_idle(|| {
                    self.events.status(status::CANCELED);
                    self.events.busy(false);
                });
                Ok(CancelOutcome::Canceled)
            }
            Some(Err(e)) => {
                error!("Error cancelling process {}: {e}", info.id);
                self.slot.if_idle(|| self.events.busy(false));
                Err(Error::Kill(e))
            }
            None => {
                // The run ended on its own between take and kill
                debug!("Run {} finished before it could be canceled", info.id);
                Ok(CancelOutcome::NotRunning)
            }
        }
    }
}
