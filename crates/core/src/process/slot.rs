use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::command_line::CommandLine;
use crate::error::{Error, Result};
use crate::event::RunTargets;

/// Reply channel for a kill request; carries the result of the kill.
pub(crate) type KillReply = oneshot::Sender<std::io::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

#[cfg(test)]
impl RunId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl Display for RunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Read-only view of the tracked process.
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub id: RunId,
    pub command: CommandLine,
    pub pid: Option<u32>,
    pub started_at: Instant,
    pub targets: RunTargets,
}

#[derive(Debug)]
pub(crate) struct RunningProcess {
    pub(crate) info: ProcessInfo,
    /// The child itself lives in the drain task; killing goes through here.
    pub(crate) kill: oneshot::Sender<KillReply>,
}

/// The one place a running process is tracked.
///
/// Cloning shares the slot. Each run gets a fresh [`RunId`] so a finishing
/// run can only ever release its own entry.
#[derive(Debug, Clone, Default)]
pub struct ProcessSlot {
    current: Arc<Mutex<Option<RunningProcess>>>,
    next_id: Arc<AtomicU64>,
}

impl ProcessSlot {
    fn lock(&self) -> MutexGuard<'_, Option<RunningProcess>> {
        // Entries are plain data, a panic mid-update cannot leave them torn
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }

    pub fn current(&self) -> Option<ProcessInfo> {
        self.lock().as_ref().map(|process| process.info.clone())
    }

    /// Reserves the slot for `command`, failing if something is already tracked.
    pub(crate) fn claim(
        &self,
        command: &CommandLine,
        targets: RunTargets,
    ) -> Result<(RunId, oneshot::Receiver<KillReply>)> {
        let mut current = self.lock();
        if current.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let id = RunId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (kill, kill_requests) = oneshot::channel();
        *current = Some(RunningProcess {
            info: ProcessInfo {
                id,
                command: command.clone(),
                pid: None,
                started_at: Instant::now(),
                targets,
            },
            kill,
        });

        Ok((id, kill_requests))
    }

    pub(crate) fn record_spawn(&self, id: RunId, pid: Option<u32>, started_at: Instant) {
        if let Some(process) = self.lock().as_mut().filter(|process| process.info.id == id) {
            process.info.pid = pid;
            process.info.started_at = started_at;
        }
    }

    /// Empties the slot if it still belongs to `id`.
    pub(crate) fn release(&self, id: RunId) -> bool {
        let mut current = self.lock();
        if current.as_ref().is_some_and(|process| process.info.id == id) {
            *current = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn take(&self) -> Option<RunningProcess> {
        self.lock().take()
    }

    /// Runs `f` under the lock if nothing is tracked.
    ///
    /// A run claims the slot before announcing itself, so events sent from
    /// `f` are always queued ahead of a newer run's announcement.
    pub(crate) fn if_idle(&self, f: impl FnOnce()) -> bool {
        let current = self.lock();
        if current.is_some() {
            return false;
        }
        f();
        true
    }
}
