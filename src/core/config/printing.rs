use std::fmt::Write as _;

use crate::core::config::data::{path_display, Config};
use crate::core::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL};

impl Config {
    /// Human readable listing of every key, marking the ones left at default.
    pub fn describe(&self) -> String {
        let mut out = String::from("Current configuration:\n");
        let _ = match &self.server_url {
            Some(url) => writeln!(out, "  server-url: {url}"),
            None => writeln!(out, "  server-url: (unset, default: {DEFAULT_SERVER_URL})"),
        };
        let _ = match self.request_timeout_secs {
            Some(0) => writeln!(out, "  request-timeout: none"),
            Some(secs) => writeln!(out, "  request-timeout: {secs}s"),
            None => writeln!(
                out,
                "  request-timeout: (unset, default: {DEFAULT_REQUEST_TIMEOUT_SECS}s)"
            ),
        };
        let _ = match self.notify_image_errors {
            Some(true) => writeln!(out, "  notify-image-errors: on"),
            Some(false) => writeln!(out, "  notify-image-errors: off"),
            None => writeln!(out, "  notify-image-errors: (unset, default: on)"),
        };
        let _ = match &self.log_file {
            Some(path) => writeln!(out, "  log-file: {}", path_display(path)),
            None => writeln!(out, "  log-file: (unset)"),
        };
        out
    }

    pub fn print_all(&self) {
        print!("{}", self.describe());
    }
}
