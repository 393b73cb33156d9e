//! Interactive chat loop.
//!
//! The loop owns a single [`ChatView`] and never shares it: keyboard events
//! and finished exchanges both arrive over channels and are applied one at a
//! time. Only the HTTP exchange itself runs on another task.

mod keybindings;
mod lifecycle;


pub use self::keybindings::{classify, KeyIntent};

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::style::{Modifier, Style};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::TextArea;

use self::lifecycle::{restore_terminal, setup_terminal};
use crate::api::ChatTransport;
use crate::core::widget::{ChatWidget, ExchangeOutcome, PendingSend};
use crate::ui::renderer::ui;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Compose,
    ImagePrompt,
}

/// Everything the renderer needs: the widget plus the editing surfaces that
/// feed it.
pub struct ChatView {
    pub widget: ChatWidget,
    pub compose: TextArea<'static>,
    pub image_prompt: TextArea<'static>,
    pub mode: InputMode,
    pub endpoint: String,
    pub status: Option<String>,
    pub exit_requested: bool,
    pub spinner_frame: usize,
}

fn new_compose_area() -> TextArea<'static> {
    let mut area = TextArea::default();
    area.set_cursor_line_style(Style::default());
    area.set_placeholder_text("Ask about your crops, or press Ctrl+O to attach a leaf photo");
    area.set_placeholder_style(Style::default().add_modifier(Modifier::DIM));
    area
}

fn new_prompt_area() -> TextArea<'static> {
    let mut area = TextArea::default();
    area.set_cursor_line_style(Style::default());
    area.set_placeholder_text("Path to a .jpg or .png image");
    area.set_placeholder_style(Style::default().add_modifier(Modifier::DIM));
    area
}

impl ChatView {
    pub fn new(widget: ChatWidget, endpoint: impl Into<String>) -> Self {
        Self {
            widget,
            compose: new_compose_area(),
            image_prompt: new_prompt_area(),
            mode: InputMode::Compose,
            endpoint: endpoint.into(),
            status: None,
            exit_requested: false,
            spinner_frame: 0,
        }
    }

    pub fn compose_text(&self) -> String {
        self.compose.lines().join("\n")
    }

    /// Apply one terminal event. Returns the pending send when the event
    /// started a send cycle.
    pub fn handle_event(&mut self, event: Event) -> Option<PendingSend> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => {
                match self.mode {
                    InputMode::Compose => self.compose.insert_str(&text),
                    InputMode::ImagePrompt => self.image_prompt.insert_str(text.trim()),
                };
                None
            }
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingSend> {
        match classify(self.mode, &key) {
            KeyIntent::Quit => {
                self.exit_requested = true;
                None
            }
            KeyIntent::Send => self.submit(),
            KeyIntent::NewLine => {
                self.compose.insert_newline();
                None
            }
            KeyIntent::OpenImagePrompt => {
                if self.widget.can_send() {
                    self.image_prompt = new_prompt_area();
                    self.mode = InputMode::ImagePrompt;
                    self.status = None;
                } else {
                    self.status = Some("Wait for the current reply before attaching an image.".into());
                }
                None
            }
            KeyIntent::SelectImage => self.select_image(),
            KeyIntent::CancelPrompt => {
                self.mode = InputMode::Compose;
                None
            }
            KeyIntent::ScrollUp(lines) => {
                self.widget.transcript_mut().scroll_up(lines);
                None
            }
            KeyIntent::ScrollDown(lines) => {
                self.widget.transcript_mut().scroll_down(lines);
                None
            }
            KeyIntent::ScrollToNewest => {
                self.widget.transcript_mut().scroll_to_newest();
                None
            }
            KeyIntent::Edit => {
                match self.mode {
                    InputMode::Compose => self.compose.input(key),
                    InputMode::ImagePrompt => self.image_prompt.input(key),
                };
                None
            }
        }
    }

    /// Move the compose text into the widget and start a send. The compose
    /// area is only cleared when the widget accepted the send.
    fn submit(&mut self) -> Option<PendingSend> {
        if !self.widget.can_send() {
            return None;
        }
        let text = self.compose_text();
        self.widget.input_mut().set_text(text);
        let pending = self.widget.begin_send()?;
        self.compose = new_compose_area();
        self.status = None;
        Some(pending)
    }

    /// Selecting a file sends immediately, together with any typed text.
    fn select_image(&mut self) -> Option<PendingSend> {
        let path = self.image_prompt.lines().join("").trim().to_string();
        self.mode = InputMode::Compose;
        if path.is_empty() {
            return None;
        }
        self.widget.input_mut().select_image(path);
        self.submit()
    }

    pub fn finish(&mut self, outcome: ExchangeOutcome) {
        self.widget.finish_send(outcome);
        self.spinner_frame = 0;
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn spawn_exchange(
    pending: PendingSend,
    transport: Arc<dyn ChatTransport>,
    outcome_tx: mpsc::UnboundedSender<ExchangeOutcome>,
) {
    tokio::spawn(async move {
        let outcome = pending.run_detached(transport).await;
        if outcome_tx.send(outcome).is_err() {
            debug!("chat loop exited before the exchange finished");
        }
    });
}

pub async fn run_chat(
    widget: ChatWidget,
    transport: Arc<dyn ChatTransport>,
) -> Result<(), Box<dyn Error>> {
    let mut view = ChatView::new(widget, transport.endpoint());
    info!(endpoint = %view.endpoint, "starting chat session");

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<ExchangeOutcome>();

    let mut spinner = tokio::time::interval(Duration::from_millis(120));
    spinner.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<(), Box<dyn Error>> = loop {
        if let Err(err) = terminal.draw(|f| ui(f, &mut view)) {
            break Err(err.into());
        }

        tokio::select! {
            Some(UiEvent::Crossterm(ev)) = event_rx.recv() => {
                if let Some(pending) = view.handle_event(ev) {
                    spawn_exchange(pending, Arc::clone(&transport), outcome_tx.clone());
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                view.finish(outcome);
            }
            _ = spinner.tick(), if !view.widget.can_send() => {
                view.spinner_frame = view.spinner_frame.wrapping_add(1);
            }
        }

        if view.exit_requested {
            break Ok(());
        }
    };

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    info!("chat session ended");
    result
}
