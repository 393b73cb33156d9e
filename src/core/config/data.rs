use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL};
use crate::core::widget::WidgetOptions;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat server; `/api/chat` is appended.
    pub server_url: Option<String>,
    /// Request timeout in seconds. `0` waits forever.
    pub request_timeout_secs: Option<u64>,
    /// Show a transcript notice when an attached image cannot be read.
    pub notify_image_errors: Option<bool>,
    /// Write diagnostics to this file.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
        {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn notify_image_errors(&self) -> bool {
        self.notify_image_errors.unwrap_or(true)
    }

    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions {
            notify_image_errors: self.notify_image_errors(),
        }
    }
}

/// Display a path with the home directory abbreviated to `~`.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
