//! Word wrapping for transcript rows.
//!
//! Transcript text is broken into rows here and rendered without ratatui's
//! `Wrap`, so the row count used for scrolling is exactly what ends up on
//! screen.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Break one line of text into rows no wider than `width` columns.
///
/// Words move to the next row whole when they fit there; words wider than a
/// row are split by character. Whitespace at a break is dropped, whitespace
/// between words on the same row is kept as typed. Always returns at least
/// one row.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut wrapper = RowBuilder::new(width.max(1));
    for (is_space, segment) in segments(text) {
        if is_space {
            wrapper.pending_space(segment);
        } else {
            wrapper.push_word(segment);
        }
    }
    wrapper.finish()
}

/// Split into alternating runs of whitespace and non-whitespace.
fn segments(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace() != is_space)
            .map_or(rest.len(), |(idx, _)| idx);
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some((is_space, segment))
    })
}

struct RowBuilder<'a> {
    width: usize,
    rows: Vec<String>,
    current: String,
    current_width: usize,
    pending: &'a str,
}

impl<'a> RowBuilder<'a> {
    fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            current: String::new(),
            current_width: 0,
            pending: "",
        }
    }

    fn pending_space(&mut self, space: &'a str) {
        self.pending = space;
    }

    fn push_word(&mut self, word: &str) {
        let pending = std::mem::take(&mut self.pending);
        let pending_width = pending.width();
        let word_width = word.width();

        if self.current_width + pending_width + word_width <= self.width {
            self.current.push_str(pending);
            self.current.push_str(word);
            self.current_width += pending_width + word_width;
            return;
        }

        if self.current_width > 0 {
            self.break_row();
        }
        if word_width <= self.width {
            self.current.push_str(word);
            self.current_width = word_width;
            return;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if self.current_width + ch_width > self.width && self.current_width > 0 {
                self.break_row();
            }
            self.current.push(ch);
            self.current_width += ch_width;
        }
    }

    fn break_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.current));
        self.current_width = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.rows.push(self.current);
        self.rows
    }
}
