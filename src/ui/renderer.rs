use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::message::Sender;
use crate::core::transcript::{TranscriptRow, SENDER_PREFIX_WIDTH};
use crate::ui::chat_loop::{ChatView, InputMode};

const SPINNER: [&str; 4] = ["○", "◔", "◑", "◕"];
const MAX_INPUT_LINES: u16 = 6;

fn sender_style(sender: Sender) -> (Style, Style) {
    match sender {
        Sender::User => (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        ),
        Sender::Bot => (
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Style::default(),
        ),
    }
}

/// Style one laid-out transcript row. Lead rows carry the sender prefix,
/// continuation rows the matching indent.
pub fn row_line(row: &TranscriptRow) -> Line<'_> {
    match row {
        TranscriptRow::Lead { sender, text } => {
            let (prefix_style, text_style) = sender_style(*sender);
            let prefix = match sender {
                Sender::User => "You: ",
                Sender::Bot => "Bot: ",
            };
            Line::from(vec![
                Span::styled(prefix, prefix_style),
                Span::styled(text.as_str(), text_style),
            ])
        }
        TranscriptRow::Continuation { sender, text } => {
            let (_, text_style) = sender_style(*sender);
            Line::from(vec![
                Span::raw(" ".repeat(SENDER_PREFIX_WIDTH)),
                Span::styled(text.as_str(), text_style),
            ])
        }
        TranscriptRow::Spacer => Line::from(""),
    }
}

pub fn ui(f: &mut Frame, view: &mut ChatView) {
    let input_lines = match view.mode {
        InputMode::Compose => u16::try_from(view.compose.lines().len()).unwrap_or(u16::MAX),
        InputMode::ImagePrompt => 1,
    }
    .clamp(1, MAX_INPUT_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(input_lines + 2),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_transcript(f, view, chunks[0]);
    render_input(f, view, chunks[1]);
    render_footer(f, view, chunks[2]);
}

fn render_transcript(f: &mut Frame, view: &mut ChatView, area: Rect) {
    let title = if view.widget.can_send() {
        format!("agrichat · {}", view.endpoint)
    } else {
        let spinner = SPINNER[view.spinner_frame % SPINNER.len()];
        format!("agrichat · {} · {spinner} waiting for reply", view.endpoint)
    };

    // The title takes the first row.
    let available_height = area.height.saturating_sub(1);
    let rows = view.widget.transcript().layout(area.width);
    let scroll_offset = view
        .widget
        .transcript_mut()
        .scroll_offset(rows.len(), available_height);

    let lines: Vec<Line<'_>> = rows.iter().map(row_line).collect();

    // Rows are already wrapped to the pane width.
    let transcript = Paragraph::new(lines)
        .block(Block::default().title(title))
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, view: &mut ChatView, area: Rect) {
    let sending = !view.widget.can_send();
    let focused = view.widget.is_input_focused() || view.mode == InputMode::ImagePrompt;

    let (title, border_style) = match view.mode {
        InputMode::ImagePrompt => (
            "Attach image (Enter to send, Esc to cancel)",
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Compose if sending => (
            "Sending… (Enter is disabled until the reply arrives)",
            Style::default().add_modifier(Modifier::DIM),
        ),
        InputMode::Compose => (
            "Message (Enter to send, Shift+Enter for new line, Ctrl+O to attach image)",
            Style::default().fg(Color::Cyan),
        ),
    };

    let cursor_style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let area_widget = match view.mode {
        InputMode::Compose => &mut view.compose,
        InputMode::ImagePrompt => &mut view.image_prompt,
    };
    area_widget.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    area_widget.set_cursor_style(cursor_style);
    f.render_widget(&*area_widget, area);
}

fn render_footer(f: &mut Frame, view: &ChatView, area: Rect) {
    let text = match &view.status {
        Some(status) => status.clone(),
        None if !view.widget.transcript().is_following_newest() => {
            "Scrolled back · Ctrl+End to jump to the newest message · Ctrl+C to quit".to_string()
        }
        None => "PageUp/PageDown to scroll · Ctrl+C to quit".to_string(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(footer, area);
}
