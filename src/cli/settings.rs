//! `agrichat set` / `agrichat unset` handling.

use std::fmt;
use std::path::PathBuf;

use crate::core::config::data::Config;
use crate::utils::url::validate_server_url;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// The provided value is not a whole number of seconds.
    InvalidTimeout(String),
    /// The provided server URL is unusable.
    InvalidUrl(String),
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "❌ Unknown config key: {key}"),
            SettingError::InvalidBoolean(input) => {
                write!(f, "❌ Invalid value '{input}'. Use on or off.")
            }
            SettingError::InvalidTimeout(input) => write!(
                f,
                "❌ Invalid timeout '{input}'. Use a number of seconds (0 disables the limit)."
            ),
            SettingError::InvalidUrl(reason) => write!(f, "❌ {reason}"),
            SettingError::MissingArgs { hint, example } => {
                write!(f, "⚠️  {hint}\nExample: {example}")
            }
        }
    }
}

impl std::error::Error for SettingError {}

/// Keys accepted by `set` and `unset`, in display order.
pub const SETTING_KEYS: &[&str] = &[
    "server-url",
    "request-timeout",
    "notify-image-errors",
    "log-file",
];

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Apply `key = args` to `config`, returning the confirmation to print.
pub fn set_value(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    let input = args.join(" ").trim().to_string();
    match key {
        "server-url" => {
            if input.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "To set the chat server, specify its base URL:",
                    example: "agrichat set server-url http://127.0.0.1:5000",
                });
            }
            validate_server_url(&input).map_err(SettingError::InvalidUrl)?;
            config.server_url = Some(input.clone());
            Ok(format!("✅ Set server-url to: {input}"))
        }
        "request-timeout" => {
            if input.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "To set the request timeout, specify seconds:",
                    example: "agrichat set request-timeout 60",
                });
            }
            let secs = input
                .trim_end_matches('s')
                .parse::<u64>()
                .map_err(|_| SettingError::InvalidTimeout(input.clone()))?;
            config.request_timeout_secs = Some(secs);
            if secs == 0 {
                Ok("✅ Set request-timeout to: none".to_string())
            } else {
                Ok(format!("✅ Set request-timeout to: {secs}s"))
            }
        }
        "notify-image-errors" => {
            if input.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "To toggle image read notices, specify on or off:",
                    example: "agrichat set notify-image-errors off",
                });
            }
            let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
            config.notify_image_errors = Some(value);
            Ok(format!(
                "✅ Set notify-image-errors to: {}",
                format_bool(value)
            ))
        }
        "log-file" => {
            if input.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "To log diagnostics, specify a file path:",
                    example: "agrichat set log-file ~/agrichat.log",
                });
            }
            config.log_file = Some(PathBuf::from(&input));
            Ok(format!("✅ Set log-file to: {input}"))
        }
        other => Err(SettingError::UnknownKey(other.to_string())),
    }
}

/// Clear `key`, returning the confirmation to print.
pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        "server-url" => config.server_url = None,
        "request-timeout" => config.request_timeout_secs = None,
        "notify-image-errors" => config.notify_image_errors = None,
        "log-file" => config.log_file = None,
        other => return Err(SettingError::UnknownKey(other.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}
