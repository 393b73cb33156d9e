//! Key classification for the chat loop.
//!
//! Keys are first mapped to a [`KeyIntent`] for the current input mode and
//! only then applied to the view, which keeps the mapping testable without a
//! terminal.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::InputMode;

/// Rows moved by PageUp/PageDown.
pub const PAGE_SCROLL_LINES: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Quit,
    Send,
    NewLine,
    OpenImagePrompt,
    SelectImage,
    CancelPrompt,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToNewest,
    /// Forward the key to the focused text area.
    Edit,
}

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

pub fn classify(mode: InputMode, key: &KeyEvent) -> KeyIntent {
    if is_ctrl(key, 'c') {
        return KeyIntent::Quit;
    }

    match mode {
        InputMode::Compose => classify_compose(key),
        InputMode::ImagePrompt => match key.code {
            KeyCode::Enter => KeyIntent::SelectImage,
            KeyCode::Esc => KeyIntent::CancelPrompt,
            _ => KeyIntent::Edit,
        },
    }
}

fn classify_compose(key: &KeyEvent) -> KeyIntent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter
            if key.modifiers.contains(KeyModifiers::SHIFT)
                || key.modifiers.contains(KeyModifiers::ALT) =>
        {
            KeyIntent::NewLine
        }
        KeyCode::Enter => KeyIntent::Send,
        KeyCode::Char('o') if ctrl => KeyIntent::OpenImagePrompt,
        KeyCode::PageUp => KeyIntent::ScrollUp(PAGE_SCROLL_LINES),
        KeyCode::PageDown => KeyIntent::ScrollDown(PAGE_SCROLL_LINES),
        KeyCode::Up if ctrl => KeyIntent::ScrollUp(1),
        KeyCode::Down if ctrl => KeyIntent::ScrollDown(1),
        KeyCode::End if ctrl => KeyIntent::ScrollToNewest,
        _ => KeyIntent::Edit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_enter_sends_and_modified_enter_breaks_line() {
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyIntent::Send
        );
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::Enter, KeyModifiers::SHIFT)),
            KeyIntent::NewLine
        );
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::Enter, KeyModifiers::ALT)),
            KeyIntent::NewLine
        );
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(classify(InputMode::Compose, &ctrl_c), KeyIntent::Quit);
        assert_eq!(classify(InputMode::ImagePrompt, &ctrl_c), KeyIntent::Quit);
    }

    #[test]
    fn image_prompt_keys() {
        assert_eq!(
            classify(InputMode::ImagePrompt, &key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyIntent::SelectImage
        );
        assert_eq!(
            classify(InputMode::ImagePrompt, &key(KeyCode::Esc, KeyModifiers::NONE)),
            KeyIntent::CancelPrompt
        );
        assert_eq!(
            classify(InputMode::ImagePrompt, &key(KeyCode::Char('o'), KeyModifiers::CONTROL)),
            KeyIntent::Edit
        );
    }

    #[test]
    fn scrolling_keys() {
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::PageUp, KeyModifiers::NONE)),
            KeyIntent::ScrollUp(PAGE_SCROLL_LINES)
        );
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::Down, KeyModifiers::CONTROL)),
            KeyIntent::ScrollDown(1)
        );
        // Plain arrows move the cursor inside the text area.
        assert_eq!(
            classify(InputMode::Compose, &key(KeyCode::Up, KeyModifiers::NONE)),
            KeyIntent::Edit
        );
    }
}
