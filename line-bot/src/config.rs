//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables once at startup.
//! Loading never fails: required secrets become `None` (with a warning at
//! startup) and malformed numeric values fall back to defaults.

use std::env;
use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// LINE channel access token used to authenticate outbound reply calls
    pub channel_access_token: Option<String>,

    /// LINE channel secret used to verify webhook signatures
    pub channel_secret: Option<String>,

    /// Base URL of the LINE Messaging API
    pub line_api_base: String,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,

    /// Whether to spawn an ngrok tunnel for the local port
    pub ngrok_enabled: bool,

    /// Base URL of the local ngrok agent inspection API
    pub ngrok_api_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            channel_access_token: non_empty(env::var("LINE_ACCESS_TOKEN").ok()),

            channel_secret: non_empty(env::var("LINE_CHANNEL_SECRET").ok()),

            line_api_base: env::var("LINE_API_BASE")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.line.me".to_string()),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            ngrok_enabled: parse_bool("NGROK_ENABLED", false),

            ngrok_api_url: env::var("NGROK_API_URL")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://127.0.0.1:4040".to_string()),
        }
    }

    /// Whether both LINE secrets are present.
    pub fn has_credentials(&self) -> bool {
        self.channel_access_token.is_some() && self.channel_secret.is_some()
    }
}

/// Normalize an optional string, treating blank values as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a boolean environment variable ("1"/"true"/"yes", case-insensitive).
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean value, using default");
            default
        }
    }
}
