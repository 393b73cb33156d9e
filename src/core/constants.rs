//! Fixed transcript notices shared by the widget and its front ends.

/// User echo for a turn that carries an image.
pub const IMAGE_PLACEHOLDER: &str = "📸 Analyzing image...";

pub const NO_RESPONSE_NOTICE: &str = "⚠️ No response received from server.";

pub const CONNECT_ERROR_NOTICE: &str = "⚠️ Cannot connect to server. Please check your connection.";

pub const IMAGE_READ_NOTICE: &str = "❌ Failed to read image file. Please try a different image.";

pub const INTERRUPTED_NOTICE: &str = "⚠️ The request was interrupted. Please try again.";

pub fn server_error_notice(status: u16) -> String {
    format!("⚠️ Server error (HTTP {status}). Please try again.")
}

/// Local development server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
