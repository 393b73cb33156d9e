use crate::core::message::{Message, Sender};
use crate::core::text_wrapping::wrap_line;

/// Columns taken by the `You: `/`Bot: ` prefix and the continuation indent.
pub const SENDER_PREFIX_WIDTH: usize = 5;

/// One screen row of the transcript after wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptRow {
    /// First row of a message, drawn after the sender prefix.
    Lead { sender: Sender, text: String },
    /// Wrapped or `\n`-separated continuation, drawn after the indent.
    Continuation { sender: Sender, text: String },
    /// Blank row after every message.
    Spacer,
}

/// The ordered, append-only list of rendered messages plus its scroll state.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    /// Lines scrolled up from the bottom. Zero means the newest entry is visible.
    scroll_from_bottom: u16,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and scroll so it is visible.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_to_newest();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn scroll_to_newest(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn is_following_newest(&self) -> bool {
        self.scroll_from_bottom == 0
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    /// Lay the transcript out for a pane `width` columns wide. Every row fits
    /// the width once the prefix is added, so the row count is exactly the
    /// rendered height.
    pub fn layout(&self, width: u16) -> Vec<TranscriptRow> {
        let text_width = usize::from(width).saturating_sub(SENDER_PREFIX_WIDTH);
        let mut rows = Vec::new();
        for message in &self.messages {
            let sender = message.sender;
            let wrapped = message
                .display_lines()
                .flat_map(|line| wrap_line(line, text_width));
            for (i, text) in wrapped.enumerate() {
                rows.push(if i == 0 {
                    TranscriptRow::Lead { sender, text }
                } else {
                    TranscriptRow::Continuation { sender, text }
                });
            }
            rows.push(TranscriptRow::Spacer);
        }
        rows
    }

    /// Top row offset for `total_rows` of laid-out transcript in a viewport of
    /// `height` rows. Clamps the user scroll so it never runs past the first
    /// message.
    pub fn scroll_offset(&mut self, total_rows: usize, height: u16) -> u16 {
        let total = u16::try_from(total_rows).unwrap_or(u16::MAX);
        let max_offset = total.saturating_sub(height);
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_offset);
        max_offset - self.scroll_from_bottom
    }
}
