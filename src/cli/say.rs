//! TUI-less "say" command

use std::error::Error;
use std::path::PathBuf;

use crate::api::ChatTransport;
use crate::core::widget::{ChatWidget, ExchangeSummary, WidgetOptions};

/// Run one send cycle on a headless widget. Returns `None` when there is
/// neither text nor an image to send.
pub async fn say<T>(
    transport: &T,
    options: WidgetOptions,
    prompt: &[String],
    image: Option<PathBuf>,
) -> Option<ExchangeSummary>
where
    T: ChatTransport + ?Sized,
{
    let mut widget = ChatWidget::new(options);
    widget.input_mut().set_text(prompt.join(" "));
    if let Some(path) = image {
        widget.input_mut().select_image(path);
    }
    widget.send_message(transport).await
}

pub async fn run_say(
    transport: &dyn ChatTransport,
    options: WidgetOptions,
    prompt: &[String],
    image: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let Some(summary) = say(transport, options, prompt, image).await else {
        eprintln!("Usage: agrichat say [--image <PATH>] <message>");
        std::process::exit(1);
    };

    match (&summary.reply, &summary.failure) {
        (Some(reply), _) => {
            for line in reply.display_lines() {
                println!("{line}");
            }
        }
        // Nothing was rendered, so report the cause directly.
        (None, Some(failure)) => eprintln!("❌ Error: {failure}"),
        (None, None) => {}
    }
    if !summary.success {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatPayload, ChatReply, TransportError};
    use crate::core::constants::IMAGE_READ_NOTICE;
    use crate::core::message::Message;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<ChatPayload>>,
    }

    #[async_trait::async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send(&self, payload: &ChatPayload) -> Result<ChatReply, TransportError> {
            self.sent.lock().unwrap().push(payload.clone());
            Ok(ChatReply {
                response: Some("Water in the morning.".to_string()),
            })
        }

        fn endpoint(&self) -> String {
            "recording".to_string()
        }
    }

    fn words(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn joins_words_into_one_message() {
        let transport = RecordingTransport::default();
        let summary = say(
            &transport,
            WidgetOptions::default(),
            &words(&["when", "to", "water?"]),
            None,
        )
        .await
        .expect("text should be sent");

        assert!(summary.success);
        assert_eq!(summary.reply, Some(Message::bot("Water in the morning.")));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message(), Some("when to water?"));
        assert_eq!(sent[0].image(), None);
    }

    #[tokio::test]
    async fn nothing_to_send_returns_none() {
        let transport = RecordingTransport::default();
        let summary = say(&transport, WidgetOptions::default(), &words(&["  "]), None).await;
        assert!(summary.is_none());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_image_fails_without_a_request() {
        let transport = RecordingTransport::default();
        let dir = tempfile::tempdir().unwrap();
        let summary = say(
            &transport,
            WidgetOptions::default(),
            &[],
            Some(dir.path().join("missing.png")),
        )
        .await
        .unwrap();

        assert!(!summary.success);
        assert_eq!(summary.reply, Some(Message::bot(IMAGE_READ_NOTICE)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn silenced_image_failure_still_carries_the_cause() {
        let transport = RecordingTransport::default();
        let dir = tempfile::tempdir().unwrap();
        let options = WidgetOptions {
            notify_image_errors: false,
        };
        let summary = say(
            &transport,
            options,
            &words(&["look"]),
            Some(dir.path().join("missing.png")),
        )
        .await
        .unwrap();

        assert!(!summary.success);
        assert_eq!(summary.reply, None);
        let failure = summary.failure.expect("the read error is reported");
        assert!(failure.contains("missing.png"), "{failure}");
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
