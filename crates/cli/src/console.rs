//! Terminal rendering of runner events.
//!
//! Sink text goes to stdout as it arrives, error-styled text in red. The
//! status line is written to stderr. Scrolling and clearing have no meaning on
//! a terminal that only appends, so they are ignored.

use std::io::{self, IsTerminal, Stderr, Stdout, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use log::{debug, warn};
use sra_desk_core::event::{Outcome, SinkId, SinkKind, Style};
use sra_desk_core::frontend::Frontend;
use sra_desk_core::process::RunId;
use sra_desk_core::sink::Sink;
use sra_desk_core::status::StatusLine;

use crate::cli_args::View;

pub struct ConsoleFrontend<O: Write, E: Write> {
    out: O,
    err: E,
    view: View,
    color: bool,
    target: Option<SinkId>,
    busy: bool,
    outcome: Option<Outcome>,
}

impl ConsoleFrontend<Stdout, Stderr> {
    /// Console on the process's own stdout/stderr, colored when stdout is a terminal.
    pub fn stdio(view: View) -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, io::stderr(), view, color)
    }
}

impl<O: Write, E: Write> ConsoleFrontend<O, E> {
    pub fn new(out: O, err: E, view: View, color: bool) -> Self {
        Self {
            out,
            err,
            view,
            color,
            target: None,
            busy: false,
            outcome: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// How the last streamed run ended, if one has.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }

    fn shows(&self, kind: SinkKind) -> bool {
        matches!(
            (self.view, kind),
            (View::Both, _) | (View::Output, SinkKind::Output) | (View::Progress, SinkKind::Progress)
        )
    }

    fn write_text(&mut self, text: &str, style: Style) -> io::Result<()> {
        match (style, self.color) {
            (Style::Error, true) => queue!(
                self.out,
                SetForegroundColor(Color::Red),
                Print(text),
                ResetColor
            )?,
            _ => queue!(self.out, Print(text))?,
        }
        self.out.flush()
    }

    fn write_status(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            queue!(
                self.err,
                SetAttribute(Attribute::Bold),
                Print(format!("[{text}]\n")),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(self.err, Print(format!("[{text}]\n")))?;
        }
        self.err.flush()
    }
}

impl<O: Write, E: Write> Sink for ConsoleFrontend<O, E> {
    fn append(&mut self, text: &str, style: Style) {
        let Some(target) = self.target else {
            return;
        };
        if !self.shows(target.kind) {
            return;
        }

        if let Err(e) = self.write_text(text, style) {
            warn!("Failed to write {} {:?} text: {e}", target.pane, target.kind);
        }
    }

    fn clear(&mut self) {}

    fn scroll_to_end(&mut self) {}

    fn scroll_to_start(&mut self) {}
}

impl<O: Write, E: Write> StatusLine for ConsoleFrontend<O, E> {
    fn set(&mut self, text: &str) {
        if let Err(e) = self.write_status(text) {
            warn!("Failed to write status: {e}");
        }
    }
}

impl<O: Write, E: Write> Frontend for ConsoleFrontend<O, E> {
    fn sink(&mut self, id: SinkId) -> &mut dyn Sink {
        self.target = Some(id);
        self
    }

    fn status(&mut self) -> &mut dyn StatusLine {
        self
    }

    fn set_busy(&mut self, busy: bool) {
        debug!("Busy: {busy}");
        self.busy = busy;
    }

    fn finished(&mut self, run: RunId, outcome: &Outcome) {
        debug!("Run {run} finished: {outcome:?}");
        self.outcome = Some(outcome.clone());
    }
}
