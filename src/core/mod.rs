pub mod config;
pub mod constants;
pub mod image;
pub mod message;
pub mod text_wrapping;
pub mod transcript;
pub mod widget;
