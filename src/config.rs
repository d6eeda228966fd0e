//! Client configuration.

use std::time::Duration;

use crate::locale::Locale;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Number of FAQ questions offered as quick replies.
pub const DEFAULT_QUICK_REPLY_LIMIT: usize = 3;

pub const ENV_API_URL: &str = "HOSPITAL_CHAT_API_URL";
pub const ENV_LOCALE: &str = "HOSPITAL_CHAT_LOCALE";
pub const ENV_TIMEOUT_SECS: &str = "HOSPITAL_CHAT_TIMEOUT_SECS";
pub const ENV_NO_STREAM: &str = "HOSPITAL_CHAT_NO_STREAM";

/// Configuration for [`ChatClient`](crate::client::ChatClient) and
/// [`ChatSession`](crate::session::ChatSession).
///
/// ```ignore
/// let config = ChatConfig::from_env()
///     .with_locale(Locale::English)
///     .with_streaming(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    pub locale: Locale,
    /// Connect timeout for every request
    pub connect_timeout: Duration,
    /// Use `/chat/stream` (true) or `/chat` (false)
    pub streaming: bool,
    /// Upper bound for one buffered SSE line
    pub max_line_bytes: usize,
    pub quick_reply_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            locale: Locale::default(),
            connect_timeout: Duration::from_secs(10),
            streaming: true,
            max_line_bytes: crate::sse::DEFAULT_MAX_LINE_BYTES,
            quick_reply_limit: DEFAULT_QUICK_REPLY_LIMIT,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    pub fn with_quick_reply_limit(mut self, limit: usize) -> Self {
        self.quick_reply_limit = limit;
        self
    }

    /// Defaults overridden by `HOSPITAL_CHAT_*` environment variables.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_LOCALE) {
            match raw.parse::<Locale>() {
                Ok(locale) => config.locale = locale,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_LOCALE, e),
            }
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.connect_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring {}: invalid value {:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        if std::env::var(ENV_NO_STREAM).is_ok() {
            config.streaming = false;
        }

        config
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
