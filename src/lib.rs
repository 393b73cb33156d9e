//! Agrichat is a terminal client for an agricultural assistant chat server.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat widget state machine, the transcript, image
//!   encoding, and persistent configuration.
//! - [`api`] defines the `/api/chat` payloads and the transport that carries
//!   them.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`cli`] parses arguments and dispatches to the chat loop, the one-shot
//!   `say` command, or configuration management.
//!
//! The binary (`src/main.rs`) only calls [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
