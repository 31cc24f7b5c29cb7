//! Display events emitted by background runs.
//!
//! Runs never touch a display directly. Every sink append, status change and
//! busy toggle is sent as an [`Event`] over an unbounded channel, and a single
//! consumer applies them in order (see [`crate::frontend`]).

use std::fmt::{Display, Formatter};

use tokio::sync::mpsc::UnboundedSender;

use crate::process::RunId;

/// Group of sinks belonging to one tool family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Download,
    Conversion,
    Upload,
    Utilities,
    Configuration,
    Validator,
    Advanced,
}

impl Pane {
    /// Output sink plus, when `with_progress`, the pane's progress sink.
    pub fn targets(self, with_progress: bool) -> RunTargets {
        RunTargets {
            output: SinkId::output(self),
            progress: with_progress.then(|| SinkId::progress(self)),
        }
    }
}

impl Display for Pane {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Pane::Download => "download",
            Pane::Conversion => "conversion",
            Pane::Upload => "upload",
            Pane::Utilities => "utilities",
            Pane::Configuration => "configuration",
            Pane::Validator => "validator",
            Pane::Advanced => "advanced",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// Verbose, raw tool output.
    Output,
    /// Terse, prefixed summary lines.
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId {
    pub pane: Pane,
    pub kind: SinkKind,
}

impl SinkId {
    pub fn output(pane: Pane) -> Self {
        Self {
            pane,
            kind: SinkKind::Output,
        }
    }

    pub fn progress(pane: Pane) -> Self {
        Self {
            pane,
            kind: SinkKind::Progress,
        }
    }
}

/// The sinks a single run writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTargets {
    pub output: SinkId,
    pub progress: Option<SinkId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    Error,
}

/// How a streamed run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The process exited. The code is informational only and does not
    /// change the reported status.
    Completed { exit_code: Option<i32> },
    TimedOut,
    Canceled,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Append {
        sink: SinkId,
        text: String,
        style: Style,
    },
    Clear(SinkId),
    ScrollToEnd(SinkId),
    ScrollToStart(SinkId),
    Status(String),
    /// Global progress indicator.
    Busy(bool),
    /// Last word from a streamed run. Carries the run's id because a canceled
    /// run can still be draining after a newer one has started.
    Finished { run: RunId, outcome: Outcome },
}

/// Thin wrapper around the event channel.
///
/// Sends never fail loudly: once the consumer is gone there is nobody left to
/// show anything to.
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: UnboundedSender<Event>,
}

impl EventSender {
    pub fn new(inner: UnboundedSender<Event>) -> Self {
        Self { inner }
    }

    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    pub fn append(&self, sink: SinkId, text: impl Into<String>) {
        self.send(Event::Append {
            sink,
            text: text.into(),
            style: Style::Plain,
        });
    }

    pub fn append_error(&self, sink: SinkId, text: impl Into<String>) {
        self.send(Event::Append {
            sink,
            text: text.into(),
            style: Style::Error,
        });
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(Event::Status(text.into()));
    }

    pub fn busy(&self, busy: bool) {
        self.send(Event::Busy(busy));
    }
}
