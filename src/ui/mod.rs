//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that turns key presses into send cycles on
//!   a [`crate::core::widget::ChatWidget`] and applies finished exchanges.
//! - [`renderer`]: frame composition for the transcript, input area and footer.
//!
//! This layer only presents and captures interaction state; the send cycle
//! itself lives in [`crate::core::widget`].

pub mod chat_loop;
pub mod renderer;
