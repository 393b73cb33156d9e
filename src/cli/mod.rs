//! Command-line interface parsing and handling
//!
//! This module parses arguments, prepares the transport and logging for a
//! session, and dispatches to the chat loop, `say`, or config management.

pub mod say;
pub mod settings;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::api::{ChatTransport, HttpChatTransport};
use crate::cli::say::run_say;
use crate::cli::settings::{set_value, unset_value, SettingError, SETTING_KEYS};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::widget::ChatWidget;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_tracing;
use crate::utils::url::validate_server_url;

/// Environment variable consulted for the server URL when `--server` is absent.
pub const SERVER_URL_ENV: &str = "AGRICHAT_SERVER_URL";

#[derive(Parser)]
#[command(name = "agrichat")]
#[command(about = "A terminal chat client for a crop-care assistant")]
#[command(
    long_about = "Agrichat is a full-screen terminal chat client for an agricultural \
assistant server. Type a question, attach a leaf photo, and read the diagnosis in the \
transcript.\n\n\
Environment Variables:\n\
  AGRICHAT_SERVER_URL  Chat server base URL (overridden by --server)\n\
  AGRICHAT_LOG         Log filter, e.g. debug or agrichat=trace (default: info)\n\n\
Controls:\n\
  Enter               Send the message\n\
  Shift+Enter         Insert a new line\n\
  Ctrl+O              Attach an image by path (sends immediately)\n\
  PageUp/PageDown     Scroll through the conversation\n\
  Ctrl+End            Jump to the newest message\n\
  Ctrl+C              Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat server base URL; `/api/chat` is appended
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Read and write configuration at this path instead of the default
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message without the TUI and print the reply
    Say {
        /// Attach this image to the message
        #[arg(short = 'i', long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Message text (words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Print the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        server,
        config,
        log_file,
    } = Args::parse();
    let config_path = match config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let session = SessionArgs {
        server: server.as_deref(),
        log_file: log_file.as_deref(),
        config_path: &config_path,
    };

    match command.unwrap_or(Commands::Chat) {
        Commands::Config => {
            let config = Config::load_from_path(&config_path)?;
            config.print_all();
            println!("\nConfig file: {}", path_display(&config_path));
            Ok(())
        }
        Commands::Set { key, value } => {
            update_config(&config_path, |config| set_value(config, &key, &value))
        }
        Commands::Unset { key } => update_config(&config_path, |config| unset_value(config, &key)),
        Commands::Chat => {
            let (config, transport) = prepare_session(&session)?;
            run_chat(ChatWidget::new(config.widget_options()), transport).await
        }
        Commands::Say { image, prompt } => {
            let (config, transport) = prepare_session(&session)?;
            run_say(transport.as_ref(), config.widget_options(), &prompt, image).await
        }
    }
}

/// Global flags that shape a chat or `say` session.
struct SessionArgs<'a> {
    server: Option<&'a str>,
    log_file: Option<&'a Path>,
    config_path: &'a Path,
}

/// Load, mutate and atomically save the config file. Setting errors are
/// reported on stderr and exit with status 1.
fn update_config<F>(config_path: &Path, mutate: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Config) -> Result<String, SettingError>,
{
    let mut config = Config::load_from_path(config_path)?;
    match mutate(&mut config) {
        Ok(confirmation) => {
            config.save_to_path(config_path)?;
            println!("{confirmation}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            if matches!(err, SettingError::UnknownKey(_)) {
                eprintln!("Available keys: {}", SETTING_KEYS.join(", "));
            }
            std::process::exit(1);
        }
    }
}

/// Pick the server URL: `--server`, then the environment, then the config
/// file, then the built-in default. Blank values are skipped.
pub fn resolve_server_url(
    cli_value: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
) -> String {
    [cli_value, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| config.server_url())
        .to_string()
}

fn prepare_session(
    args: &SessionArgs<'_>,
) -> Result<(Config, Arc<dyn ChatTransport>), Box<dyn Error>> {
    let config = Config::load_from_path(args.config_path)?;

    let log_file = args.log_file.or(config.log_file.as_deref());
    if let Err(err) = init_tracing(log_file) {
        eprintln!("⚠️  Logging disabled: {err}");
    }

    let env_value = std::env::var(SERVER_URL_ENV).ok();
    let server_url = resolve_server_url(args.server, env_value.as_deref(), &config);
    validate_server_url(&server_url)?;

    let timeout = config.request_timeout();
    if timeout.is_none() {
        warn!("request timeout disabled; a stalled server will block sending");
    }
    let transport = HttpChatTransport::new(&server_url, timeout)?;
    info!(url = %transport.chat_url(), "chat transport ready");

    Ok((config, Arc::new(transport)))
}
