//! Event loops that keep a frontend in step with a dispatched action.

use log::{debug, info};
use sra_desk_core::error::{Error, Result};
use sra_desk_core::event::{Event, Outcome};
use sra_desk_core::frontend::Frontend;
use sra_desk_core::process::{BatchReport, CancellationController, RunId};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Applies events until run `run` has finished and gone idle.
///
/// The first Ctrl-C cancels the run; the run's own events then finish the
/// loop. Events already queued at that point, such as the cancel status, are
/// still applied.
pub async fn follow_stream(
    rx: &mut UnboundedReceiver<Event>,
    frontend: &mut impl Frontend,
    controller: CancellationController,
    run: RunId,
) -> Result<Option<Outcome>> {
    let mut outcome = None;
    let mut cancel_requested = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                match &event {
                    Event::Finished { run: finished, outcome: result } if *finished == run => {
                        outcome = Some(result.clone());
                    }
                    Event::Finished { run: finished, .. } => {
                        debug!("Ignoring late result of run {finished}");
                    }
                    _ => {}
                }
                let done = outcome.is_some() && matches!(event, Event::Busy(false));
                frontend.apply(event);
                if done {
                    break;
                }
            }
            result = &mut ctrl_c, if !cancel_requested => {
                result?;
                cancel_requested = true;
                info!("Interrupt received, canceling");
                match controller.cancel().await {
                    Ok(cancel_outcome) => debug!("{}", cancel_outcome.message()),
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }

    while let Ok(event) = rx.try_recv() {
        frontend.apply(event);
    }

    Ok(outcome)
}

/// Applies events until the batch task has returned and its events are drained.
pub async fn follow_batch(
    rx: &mut UnboundedReceiver<Event>,
    frontend: &mut impl Frontend,
    mut handle: JoinHandle<BatchReport>,
) -> Result<BatchReport> {
    let report = loop {
        tokio::select! {
            Some(event) = rx.recv() => frontend.apply(event),
            joined = &mut handle => {
                break joined.map_err(|e| Error::Terminal(std::io::Error::other(e)))?;
            }
        }
    };

    while let Ok(event) = rx.try_recv() {
        frontend.apply(event);
    }

    Ok(report)
}
