//! Process supervision: the streaming runner, its single tracked-process
//! slot, cancellation, and sequential batches.

pub mod batch;
pub mod cancel;
pub mod runner;
pub mod slot;

pub use batch::{run_batch, spawn_batch, BatchItem, BatchReport, ItemResult};
pub use cancel::{CancelOutcome, CancellationController};
pub use runner::ProcessRunner;
pub use slot::{ProcessInfo, RunId};
