//! The chat widget state machine.
//!
//! A send cycle is `Idle -> Sending -> Idle`. It is split into three phases
//! so an interactive front end can keep redrawing while I/O is pending:
//!
//! 1. [`ChatWidget::begin_send`] runs the guards, echoes the user turn, clears
//!    the inputs and disables sending.
//! 2. [`PendingSend::run`] reads the image (if any) and performs the single
//!    HTTP exchange. It never fails; every exit path becomes an
//!    [`ExchangeOutcome`].
//! 3. [`ChatWidget::finish_send`] renders the outcome and re-enables input.
//!
//! [`ChatWidget::send_message`] chains the phases for headless callers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ChatPayload, ChatReply, ChatTransport, TransportError};
use crate::core::constants::{
    server_error_notice, CONNECT_ERROR_NOTICE, IMAGE_PLACEHOLDER, IMAGE_READ_NOTICE,
    INTERRUPTED_NOTICE, NO_RESPONSE_NOTICE,
};
use crate::core::image::{read_image_data_url, ImageError};
use crate::core::message::{Message, Sender};
use crate::core::transcript::Transcript;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

/// Text box and image selection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    text: String,
    image: Option<PathBuf>,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn select_image(&mut self, path: impl Into<PathBuf>) {
        self.image = Some(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }

    fn take(&mut self) -> (Option<String>, Option<PathBuf>) {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        let text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        (text, self.image.take())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WidgetOptions {
    /// Show a transcript notice when an attached image cannot be read.
    pub notify_image_errors: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            notify_image_errors: true,
        }
    }
}

/// Result of one exchange, covering every way a send cycle can end.
#[derive(Debug)]
pub enum ExchangeOutcome {
    Reply(ChatReply),
    Transport(TransportError),
    Image(ImageError),
    /// The task running the exchange panicked or was aborted.
    Interrupted(String),
    /// Neither a message nor an image survived; no request was made.
    NothingToSend,
}

impl ExchangeOutcome {
    /// True when the server produced a usable reply.
    pub fn is_success(&self) -> bool {
        matches!(self, ExchangeOutcome::Reply(reply) if reply.text().is_some())
    }

    /// Description of the underlying failure, for callers that report it
    /// outside the transcript.
    pub fn failure(&self) -> Option<String> {
        match self {
            ExchangeOutcome::Reply(_) | ExchangeOutcome::NothingToSend => None,
            ExchangeOutcome::Transport(err) => Some(err.to_string()),
            ExchangeOutcome::Image(err) => Some(err.to_string()),
            ExchangeOutcome::Interrupted(reason) => Some(format!("request interrupted: {reason}")),
        }
    }
}

/// The inputs captured by [`ChatWidget::begin_send`], detached from the
/// widget so they can be sent from another task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    message: Option<String>,
    image: Option<PathBuf>,
}

impl PendingSend {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Encode the image (if any) and assemble the request payload. `None`
    /// when there is nothing to send.
    pub async fn into_payload(self) -> Result<Option<ChatPayload>, ImageError> {
        let image = match &self.image {
            Some(path) => Some(read_image_data_url(path).await?),
            None => None,
        };
        Ok(ChatPayload::new(self.message, image))
    }

    pub async fn run<T>(self, transport: &T) -> ExchangeOutcome
    where
        T: ChatTransport + ?Sized,
    {
        match self.into_payload().await {
            Ok(Some(payload)) => exchange(transport, &payload).await,
            Ok(None) => ExchangeOutcome::NothingToSend,
            Err(err) => ExchangeOutcome::Image(err),
        }
    }

    /// Run the exchange on its own task. A panic inside the transport still
    /// yields an outcome, so the caller can always finish the cycle.
    pub async fn run_detached(self, transport: Arc<dyn ChatTransport>) -> ExchangeOutcome {
        let handle = tokio::spawn(async move { self.run(transport.as_ref()).await });
        match handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "chat exchange task did not complete");
                ExchangeOutcome::Interrupted(err.to_string())
            }
        }
    }
}

/// Issue exactly one request for `payload`.
pub async fn exchange<T>(transport: &T, payload: &ChatPayload) -> ExchangeOutcome
where
    T: ChatTransport + ?Sized,
{
    match transport.send(payload).await {
        Ok(reply) => ExchangeOutcome::Reply(reply),
        Err(err) => ExchangeOutcome::Transport(err),
    }
}

#[derive(Debug)]
pub struct ChatWidget {
    transcript: Transcript,
    input: InputState,
    state: SendState,
    input_focused: bool,
    options: WidgetOptions,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new(WidgetOptions::default())
    }
}

impl ChatWidget {
    pub fn new(options: WidgetOptions) -> Self {
        Self {
            transcript: Transcript::new(),
            input: InputState::default(),
            state: SendState::Idle,
            input_focused: true,
            options,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    /// Whether the send affordance is enabled.
    pub fn can_send(&self) -> bool {
        self.state == SendState::Idle
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Append a message to the transcript and reveal it.
    pub fn add_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.transcript.push(Message::new(sender, text));
    }

    /// Phase one of a send. Returns `None` (and changes nothing) when the
    /// input is empty or a send is already in flight.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        if self.state == SendState::Sending {
            debug!("send ignored: a request is already in flight");
            return None;
        }
        if self.input.is_empty() {
            return None;
        }

        let (message, image) = self.input.take();
        let echo = match (&message, &image) {
            (Some(text), Some(_)) => format!("{text}\n{IMAGE_PLACEHOLDER}"),
            (Some(text), None) => text.clone(),
            (None, Some(_)) => IMAGE_PLACEHOLDER.to_string(),
            (None, None) => unreachable!("empty input is rejected above"),
        };
        self.add_message(Sender::User, echo);

        self.state = SendState::Sending;
        self.input_focused = false;
        info!(
            has_message = message.is_some(),
            has_image = image.is_some(),
            "sending chat turn"
        );
        Some(PendingSend { message, image })
    }

    /// Phase three of a send. Renders the outcome and re-enables input on
    /// every path.
    pub fn finish_send(&mut self, outcome: ExchangeOutcome) -> ExchangeSummary {
        let success = outcome.is_success();
        let failure = outcome.failure();
        let text = match outcome {
            ExchangeOutcome::Reply(reply) => match reply.text() {
                Some(text) => Some(text.to_string()),
                None => {
                    warn!("chat reply had no response text");
                    Some(NO_RESPONSE_NOTICE.to_string())
                }
            },
            ExchangeOutcome::Transport(TransportError::Status { status, response }) => {
                Some(response.unwrap_or_else(|| server_error_notice(status)))
            }
            ExchangeOutcome::Transport(TransportError::Decode(reason)) => {
                warn!(%reason, "chat reply was not valid JSON");
                Some(NO_RESPONSE_NOTICE.to_string())
            }
            ExchangeOutcome::Transport(TransportError::Connect(reason)) => {
                warn!(%reason, "cannot reach chat server");
                Some(CONNECT_ERROR_NOTICE.to_string())
            }
            ExchangeOutcome::Image(err) => {
                warn!(error = %err, "image attachment could not be read");
                self.options
                    .notify_image_errors
                    .then(|| IMAGE_READ_NOTICE.to_string())
            }
            ExchangeOutcome::Interrupted(_) => Some(INTERRUPTED_NOTICE.to_string()),
            ExchangeOutcome::NothingToSend => {
                debug!("send cycle ended without a payload");
                None
            }
        };

        let reply = text.map(|text| {
            let message = Message::bot(text);
            self.transcript.push(message.clone());
            message
        });

        self.state = SendState::Idle;
        self.input_focused = true;
        ExchangeSummary {
            reply,
            success,
            failure,
        }
    }

    /// Perform the exchange for an already encoded payload and render the
    /// result. Input is re-enabled whatever the transport returns.
    pub async fn send_payload<T>(&mut self, transport: &T, payload: ChatPayload) -> ExchangeSummary
    where
        T: ChatTransport + ?Sized,
    {
        self.state = SendState::Sending;
        self.input_focused = false;
        let outcome = exchange(transport, &payload).await;
        self.finish_send(outcome)
    }

    /// Send whatever is in the input fields: echo, encode, exchange, render.
    /// Returns `None` without side effects when there is nothing to send or a
    /// send is already running.
    pub async fn send_message<T>(&mut self, transport: &T) -> Option<ExchangeSummary>
    where
        T: ChatTransport + ?Sized,
    {
        let pending = self.begin_send()?;
        let summary = match pending.into_payload().await {
            Ok(Some(payload)) => self.send_payload(transport, payload).await,
            Ok(None) => self.finish_send(ExchangeOutcome::NothingToSend),
            Err(err) => self.finish_send(ExchangeOutcome::Image(err)),
        };
        Some(summary)
    }
}

/// What a finished send cycle appended for the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeSummary {
    pub reply: Option<Message>,
    /// The server produced a usable reply.
    pub success: bool,
    /// What went wrong, when the cycle failed before or during the request.
    pub failure: Option<String>,
}
