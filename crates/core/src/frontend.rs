//! The consumer side of the event channel.
//!
//! A [`Frontend`] owns every sink and the status line. Applying events from a
//! single place keeps all display mutation on one execution context, no matter
//! how many background runs produced them.

use indexmap::IndexMap;

use crate::event::{Event, Outcome, SinkId};
use crate::process::RunId;
use crate::sink::{Sink, TextBuffer};
use crate::status::{StatusBar, StatusLine};

pub trait Frontend {
    fn sink(&mut self, id: SinkId) -> &mut dyn Sink;
    fn status(&mut self) -> &mut dyn StatusLine;
    fn set_busy(&mut self, busy: bool);
    fn finished(&mut self, _run: RunId, _outcome: &Outcome) {}

    fn apply(&mut self, event: Event) {
        match event {
            Event::Append { sink, text, style } => self.sink(sink).append(&text, style),
            Event::Clear(sink) => self.sink(sink).clear(),
            Event::ScrollToEnd(sink) => self.sink(sink).scroll_to_end(),
            Event::ScrollToStart(sink) => self.sink(sink).scroll_to_start(),
            Event::Status(text) => self.status().set(&text),
            Event::Busy(busy) => self.set_busy(busy),
            Event::Finished { run, outcome } => self.finished(run, &outcome),
        }
    }
}

/// Frontend that keeps everything in memory; sinks appear in first-use order.
#[derive(Debug, Default)]
pub struct MemoryFrontend {
    sinks: IndexMap<SinkId, TextBuffer>,
    status: StatusBar,
    busy: bool,
    outcomes: Vec<(RunId, Outcome)>,
}

impl MemoryFrontend {
    pub fn buffer(&self, id: SinkId) -> Option<&TextBuffer> {
        self.sinks.get(&id)
    }

    /// Contents of a sink, empty if it was never written.
    pub fn text(&self, id: SinkId) -> String {
        self.buffer(id).map(TextBuffer::contents).unwrap_or_default()
    }

    pub fn sink_ids(&self) -> impl Iterator<Item = &SinkId> {
        self.sinks.keys()
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn outcomes(&self) -> &[(RunId, Outcome)] {
        &self.outcomes
    }
}

impl Frontend for MemoryFrontend {
    fn sink(&mut self, id: SinkId) -> &mut dyn Sink {
        self.sinks.entry(id).or_default()
    }

    fn status(&mut self) -> &mut dyn StatusLine {
        &mut self.status
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn finished(&mut self, run: RunId, outcome: &Outcome) {
        self.outcomes.push((run, outcome.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Pane, Style};
    use crate::sink::ScrollPosition;

    #[test]
    fn test_apply_routes_to_sinks() {
        let mut frontend = MemoryFrontend::default();
        let output = SinkId::output(Pane::Validator);
        let progress = SinkId::progress(Pane::Validator);

        frontend.apply(Event::Append {
            sink: progress,
            text: "[OUTPUT] ok\n".to_string(),
            style: Style::Plain,
        });
        frontend.apply(Event::Append {
            sink: output,
            text: "ok\n".to_string(),
            style: Style::Plain,
        });

        assert_eq!(frontend.text(output), "ok\n");
        assert_eq!(frontend.text(progress), "[OUTPUT] ok\n");
        let order: Vec<SinkId> = frontend.sink_ids().copied().collect();
        assert_eq!(order, [progress, output]);
    }

    #[test]
    fn test_apply_status_busy_and_scroll() {
        let mut frontend = MemoryFrontend::default();
        let output = SinkId::output(Pane::Download);
        assert_eq!(frontend.status_text(), "Ready");

        frontend.apply(Event::Busy(true));
        frontend.apply(Event::Status("Running: srapath X".to_string()));
        frontend.apply(Event::ScrollToEnd(output));

        assert!(frontend.is_busy());
        assert_eq!(frontend.status_text(), "Running: srapath X");
        assert_eq!(
            frontend.buffer(output).unwrap().position(),
            ScrollPosition::End
        );

        let run = RunId::from_raw(7);
        frontend.apply(Event::Finished {
            run,
            outcome: Outcome::TimedOut,
        });
        frontend.apply(Event::Busy(false));
        assert!(!frontend.is_busy());
        assert_eq!(frontend.outcomes(), [(run, Outcome::TimedOut)]);
    }

    #[test]
    fn test_unwritten_sink_is_empty() {
        let frontend = MemoryFrontend::default();
        assert_eq!(frontend.text(SinkId::output(Pane::Upload)), "");
    }
}
