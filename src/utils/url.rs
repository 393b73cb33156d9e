//! URL helpers for building the chat endpoint from a configured server URL.

use reqwest::Url;

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use agrichat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:5000/"), "http://127.0.0.1:5000");
/// assert_eq!(normalize_base_url("https://farm.example/app///"), "https://farm.example/app");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use agrichat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:5000/", "/api/chat"),
///     "http://127.0.0.1:5000/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Check that a server URL is an absolute http(s) URL with a host.
pub fn validate_server_url(server_url: &str) -> Result<(), String> {
    let parsed = Url::parse(server_url.trim())
        .map_err(|err| format!("invalid server URL '{server_url}': {err}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "invalid server URL '{server_url}': unsupported scheme '{other}'"
            ))
        }
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("invalid server URL '{server_url}': missing host"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_every_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5000"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000///"),
            "http://localhost:5000"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_joins_chat_endpoint() {
        assert_eq!(
            construct_api_url("http://localhost:5000", "api/chat"),
            "http://localhost:5000/api/chat"
        );
        // Servers mounted under a prefix keep the prefix.
        assert_eq!(
            construct_api_url("https://farm.example/assistant/", "/api/chat"),
            "https://farm.example/assistant/api/chat"
        );
    }

    #[test]
    fn validate_accepts_http_and_https() {
        assert!(validate_server_url("http://127.0.0.1:5000").is_ok());
        assert!(validate_server_url("https://farm.example/").is_ok());
    }

    #[test]
    fn validate_rejects_relative_and_foreign_urls() {
        assert!(validate_server_url("/api/chat").is_err());
        assert!(validate_server_url("ftp://farm.example").is_err());
        let err = validate_server_url("file:///tmp/chat").unwrap_err();
        assert!(err.contains("unsupported scheme"), "{err}");
    }
}
