//! Client configuration loaded from environment variables.
//!
//! All fields have defaults suitable for a backend running locally on
//! port 8000. Call `dotenvy::dotenv()` before [`ClientConfig::from_env`]
//! to pick up a `.env` file.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// Default REST base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default location of the persisted session record.
pub const DEFAULT_SESSION_FILE: &str = ".bridgeai/session.json";

/// Timer settings for the chat connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Fixed delay between a dropped connection and the next attempt.
    pub reconnect_delay: Duration,
    /// How long a connect attempt may stay pending before it is abandoned.
    pub connect_timeout: Duration,
    /// Inactivity window after the last keystroke before `typing:false` is sent.
    pub typing_idle: Duration,
    /// How long a peer's `typing:true` is shown without a follow-up event.
    pub peer_typing_ttl: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_millis(3000),
            connect_timeout: Duration::from_secs(10),
            typing_idle: Duration::from_millis(2000),
            peer_typing_ttl: Duration::from_millis(2000),
        }
    }
}

/// Endpoint, storage and timing configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub api_url: String,
    /// WebSocket base URL without a trailing slash, e.g. `ws://localhost:8000`.
    pub ws_url: String,
    /// Path of the JSON session record.
    pub session_file: PathBuf,
    /// Per-request timeout for REST calls.
    pub request_timeout: Duration,
    pub chat: ChatSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: "ws://localhost:8000".to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: Duration::from_secs(30),
            chat: ChatSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `BRIDGEAI_API_URL`          | `http://localhost:8000`          |
    /// | `BRIDGEAI_WS_URL`           | derived from `BRIDGEAI_API_URL`  |
    /// | `BRIDGEAI_SESSION_FILE`     | `.bridgeai/session.json`         |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                             |
    /// | `CHAT_RECONNECT_DELAY_MS`   | `3000`                           |
    /// | `CHAT_CONNECT_TIMEOUT_SECS` | `10`                             |
    /// | `CHAT_TYPING_IDLE_MS`       | `2000`                           |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("BRIDGEAI_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let ws_url = match lookup("BRIDGEAI_WS_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => derive_ws_url(&api_url)?,
        };

        let session_file = lookup("BRIDGEAI_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let defaults = ChatSettings::default();
        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?);
        let chat = ChatSettings {
            reconnect_delay: Duration::from_millis(parse_or(
                &lookup,
                "CHAT_RECONNECT_DELAY_MS",
                defaults.reconnect_delay.as_millis() as u64,
            )?),
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "CHAT_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )?),
            typing_idle: Duration::from_millis(parse_or(
                &lookup,
                "CHAT_TYPING_IDLE_MS",
                defaults.typing_idle.as_millis() as u64,
            )?),
            peer_typing_ttl: defaults.peer_typing_ttl,
        };

        Ok(Self {
            api_url,
            ws_url,
            session_file,
            request_timeout,
            chat,
        })
    }
}

/// Map an HTTP base URL onto the matching WebSocket scheme.
pub fn derive_ws_url(api_url: &str) -> Result<String, CoreError> {
    if let Some(rest) = api_url.strip_prefix("https://") {
        Ok(format!("wss://{rest}"))
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        Ok(format!("ws://{rest}"))
    } else {
        Err(CoreError::Config(format!(
            "BRIDGEAI_API_URL must start with http:// or https://, got {api_url}"
        )))
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> Result<u64, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{key} must be a non-negative integer"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.ws_url, "ws://localhost:8000");
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.chat, ChatSettings::default());
    }

    #[test]
    fn ws_url_follows_https_api_url() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            "BRIDGEAI_API_URL",
            "https://api.bridge.example/",
        )]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.bridge.example");
        assert_eq!(config.ws_url, "wss://api.bridge.example");
    }

    #[test]
    fn explicit_ws_url_wins() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BRIDGEAI_API_URL", "http://localhost:8000"),
            ("BRIDGEAI_WS_URL", "ws://chat.internal:9000"),
        ]))
        .unwrap();
        assert_eq!(config.ws_url, "ws://chat.internal:9000");
    }

    #[test]
    fn chat_timings_are_overridable() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("CHAT_RECONNECT_DELAY_MS", "500"),
            ("CHAT_CONNECT_TIMEOUT_SECS", "4"),
            ("CHAT_TYPING_IDLE_MS", "750"),
        ]))
        .unwrap();
        assert_eq!(config.chat.reconnect_delay, Duration::from_millis(500));
        assert_eq!(config.chat.connect_timeout, Duration::from_secs(4));
        assert_eq!(config.chat.typing_idle, Duration::from_millis(750));
    }

    #[test]
    fn malformed_number_is_a_config_error() {
        let result = ClientConfig::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")]));
        assert_matches!(result, Err(CoreError::Config(_)));
    }

    #[test]
    fn api_url_without_scheme_is_rejected() {
        let result = ClientConfig::from_lookup(lookup_from(&[("BRIDGEAI_API_URL", "localhost")]));
        assert_matches!(result, Err(CoreError::Config(_)));
    }
}
