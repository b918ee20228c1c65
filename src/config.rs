//! Client configuration, read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const APP_NAME: &str = "documind";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const TOKEN_FILE_NAME: &str = "token.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend root, without a trailing slash.
    pub base_url: String,

    /// Where the bearer token is kept between runs.
    pub token_path: PathBuf,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// Enables debug-level logging.
    pub verbose: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    ///
    /// - `DOCUMIND_BASE_URL` (default `http://localhost:8000`)
    /// - `DOCUMIND_TOKEN_FILE` (default `$HOME/.local/share/documind/token.json`)
    /// - `DOCUMIND_TIMEOUT_SECS` (default: no timeout)
    /// - `DOCUMIND_LOG` set to `debug` or `trace` turns on verbose logging
    pub fn from_env() -> Self {
        Self {
            base_url: normalize_base_url(&env_or("DOCUMIND_BASE_URL", DEFAULT_BASE_URL)),
            token_path: std::env::var("DOCUMIND_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_path()),
            request_timeout: std::env::var("DOCUMIND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            verbose: std::env::var("DOCUMIND_LOG")
                .map(|v| v.eq_ignore_ascii_case("debug") || v.eq_ignore_ascii_case("trace"))
                .unwrap_or(false),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_path: default_token_path(),
            request_timeout: None,
            verbose: false,
        }
    }
}

pub fn default_token_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
    PathBuf::from(home)
        .join(".local/share")
        .join(APP_NAME)
        .join(TOKEN_FILE_NAME)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
