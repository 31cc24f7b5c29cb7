use crate::event::Style;

/// Append-only text destination with error highlighting.
pub trait Sink {
    fn append(&mut self, text: &str, style: Style);
    fn clear(&mut self);
    fn scroll_to_end(&mut self);
    fn scroll_to_start(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    #[default]
    Start,
    End,
}

/// In-memory sink keeping styled segments in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    segments: Vec<Segment>,
    position: ScrollPosition,
}

impl TextBuffer {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    /// All text, styles dropped.
    pub fn contents(&self) -> String {
        self.segments.iter().map(|segment| segment.text.as_str()).collect()
    }

    pub fn error_text(&self) -> String {
        self.segments
            .iter()
            .filter(|segment| segment.style == Style::Error)
            .map(|segment| segment.text.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

impl Sink for TextBuffer {
    fn append(&mut self, text: &str, style: Style) {
        // Merge runs of the same style
        if let Some(last) = self.segments.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }

        self.segments.push(Segment {
            text: text.to_string(),
            style,
        });
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.position = ScrollPosition::Start;
    }

    fn scroll_to_end(&mut self) {
        self.position = ScrollPosition::End;
    }

    fn scroll_to_start(&mut self) {
        self.position = ScrollPosition::Start;
    }
}
