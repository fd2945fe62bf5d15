//! Console BFF configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only `BACKEND_BASE_URL` is required.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};

/// Default session cookie lifetime: seven days.
pub const DEFAULT_ACCESS_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level BFF configuration.
///
/// Loaded once at startup via [`ConsoleConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Backend origin, without trailing slash (e.g. `https://api.example.com`).
    pub backend_base_url: String,

    /// Fixed `Accept-Language` sent on every backend call.
    pub accept_language: String,

    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,

    /// Max-Age of the session cookie, in seconds.
    pub access_cookie_max_age_secs: i64,

    /// Clear the session cookies whenever an `/api/*` response is 401.
    pub clear_cookie_on_unauthorized: bool,

    /// Locale prefixes the console pages accept.
    pub supported_locales: Vec<String>,

    /// Locale used when a page path carries none.
    pub default_locale: String,

    /// Directory holding the pre-built console bundle.
    pub console_dir: PathBuf,

    /// Offset applied to datetime inputs that carry no offset of their own.
    pub console_utc_offset: FixedOffset,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl ConsoleConfig {
    /// Creates a configuration with defaults for everything except the
    /// backend origin.
    #[must_use]
    pub fn new(backend_base_url: &str) -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            backend_base_url: backend_base_url.trim_end_matches('/').to_string(),
            accept_language: "en".to_string(),
            secure_cookies: false,
            access_cookie_max_age_secs: DEFAULT_ACCESS_COOKIE_MAX_AGE_SECS,
            clear_cookie_on_unauthorized: true,
            supported_locales: vec!["en".to_string()],
            default_locale: "en".to_string(),
            console_dir: PathBuf::from("./public"),
            console_utc_offset: Utc.fix(),
            log_format: LogFormat::Text,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKEND_BASE_URL` is missing, or if
    /// `LISTEN_ADDR` / `CONSOLE_UTC_OFFSET` are set but cannot be parsed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let backend_base_url = std::env::var("BACKEND_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or("BACKEND_BASE_URL is not set")?;
        let mut config = Self::new(backend_base_url.trim());

        config.listen_addr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        if let Ok(lang) = std::env::var("BACKEND_ACCEPT_LANGUAGE") {
            if !lang.trim().is_empty() {
                config.accept_language = lang.trim().to_string();
            }
        }

        let is_production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        config.secure_cookies = parse_env_bool("SECURE_COOKIES", is_production);
        config.access_cookie_max_age_secs =
            parse_env("ACCESS_COOKIE_MAX_AGE_SECS", DEFAULT_ACCESS_COOKIE_MAX_AGE_SECS);
        config.clear_cookie_on_unauthorized = parse_env_bool("CLEAR_COOKIE_ON_UNAUTHORIZED", true);

        if let Ok(raw) = std::env::var("SUPPORTED_LOCALES") {
            let locales = parse_locales(&raw);
            if !locales.is_empty() {
                config.supported_locales = locales;
            }
        }
        if let Ok(locale) = std::env::var("DEFAULT_LOCALE") {
            let locale = locale.trim().to_ascii_lowercase();
            if !locale.is_empty() {
                config.default_locale = locale;
            }
        }
        if !config.supported_locales.contains(&config.default_locale) {
            config.supported_locales.push(config.default_locale.clone());
        }

        if let Ok(dir) = std::env::var("CONSOLE_DIR") {
            config.console_dir = PathBuf::from(dir);
        }
        if let Ok(offset) = std::env::var("CONSOLE_UTC_OFFSET") {
            config.console_utc_offset = offset
                .trim()
                .parse()
                .map_err(|e| format!("invalid CONSOLE_UTC_OFFSET {offset:?}: {e}"))?;
        }
        config.log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(config)
    }
}

/// Splits a comma-separated locale list, lower-casing and dropping blanks.
fn parse_locales(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|l| l.trim().to_ascii_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let config = ConsoleConfig::new("http://backend:8080/");
        assert_eq!(config.backend_base_url, "http://backend:8080");
        assert_eq!(config.access_cookie_max_age_secs, 604_800);
        assert_eq!(config.supported_locales, vec!["en".to_string()]);
    }

    #[test]
    fn locale_list_is_normalized() {
        assert_eq!(
            parse_locales(" EN, fa ,,de"),
            vec!["en".to_string(), "fa".to_string(), "de".to_string()]
        );
    }

    #[test]
    fn default_offset_is_utc() {
        let config = ConsoleConfig::new("http://backend");
        assert_eq!(config.console_utc_offset.local_minus_utc(), 0);
    }
}
