//! Settings for reaching the posts API under test.

use crate::error::{ClientError, ClientResult};
use std::time::Duration;
use url::Url;

/// Default base URL of the server under test.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable names.
pub mod env_keys {
    /// Base URL of the server
    pub const BASE_URL: &str = "POSTS_API_BASE_URL";
    /// Latency budget in milliseconds
    pub const LATENCY_BUDGET_MS: &str = "POSTS_API_LATENCY_BUDGET_MS";
    /// Client request timeout in seconds
    pub const TIMEOUT_SECS: &str = "POSTS_API_TIMEOUT_SECS";
    /// Identifier assumed not to exist
    pub const MISSING_ID: &str = "POSTS_API_MISSING_ID";
    /// Expected delete confirmation message (empty means any non-empty message)
    pub const DELETE_MESSAGE: &str = "POSTS_API_DELETE_MESSAGE";
    /// Log output format for test binaries (`json` or plain)
    pub const LOG_FORMAT: &str = "POSTS_API_LOG_FORMAT";
}

/// Posts API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Upper bound on a single round trip
    pub latency_budget: Duration,
    /// Client-side request timeout
    pub request_timeout: Duration,
    /// Identifier assumed to be absent on the server
    pub missing_post_id: u64,
    /// Route assumed not to exist
    pub invalid_path: String,
    /// Exact delete confirmation, or `None` to accept any non-empty message
    pub delete_message: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            latency_budget: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
            missing_post_id: 9999,
            invalid_path: "/invalidendpoint".to_string(),
            delete_message: Some("Post deleted".to_string()),
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Default::default()
        })
    }

    /// Build from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any set variable holds an unusable value.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any present value is unusable.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(env_keys::BASE_URL) {
            Some(url) => Self::new(&url)?,
            None => Self::default(),
        };

        if let Some(ms) = lookup(env_keys::LATENCY_BUDGET_MS) {
            config.latency_budget = Duration::from_millis(parse_number(env_keys::LATENCY_BUDGET_MS, &ms)?);
        }
        if let Some(secs) = lookup(env_keys::TIMEOUT_SECS) {
            let secs = parse_number(env_keys::TIMEOUT_SECS, &secs)?;
            if secs == 0 {
                return Err(ClientError::invalid_config(env_keys::TIMEOUT_SECS, "must be positive"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(id) = lookup(env_keys::MISSING_ID) {
            config.missing_post_id = parse_number(env_keys::MISSING_ID, &id)?;
        }
        if let Some(message) = lookup(env_keys::DELETE_MESSAGE) {
            config.delete_message = (!message.is_empty()).then_some(message);
        }

        Ok(config)
    }

    /// Set the latency budget.
    #[must_use]
    pub const fn with_latency_budget(mut self, budget: Duration) -> Self {
        self.latency_budget = budget;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the expected delete confirmation.
    #[must_use]
    pub fn with_delete_message(mut self, message: Option<String>) -> Self {
        self.delete_message = message;
        self
    }

    /// Absolute URL for a path relative to the base.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> ClientResult<String> {
    let parsed = Url::parse(raw.trim())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::invalid_config(
            env_keys::BASE_URL,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_number(key: &str, raw: &str) -> ClientResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::invalid_config(key, format!("'{raw}' is not a non-negative integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.latency_budget, Duration::from_millis(500));
        assert_eq!(config.missing_post_id, 9999);
        assert_eq!(config.invalid_path, "/invalidendpoint");
        assert_eq!(config.delete_message.as_deref(), Some("Post deleted"));
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ApiConfig::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.url_for("/posts"), "http://127.0.0.1:5000/posts");
        assert_eq!(config.url_for("posts/2"), "http://127.0.0.1:5000/posts/2");
    }

    #[test]
    fn test_base_path_is_kept() {
        let config = ApiConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(config.url_for("/posts"), "https://api.example.com/v1/posts");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = ApiConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (env_keys::BASE_URL, "http://localhost:8080/"),
            (env_keys::LATENCY_BUDGET_MS, "250"),
            (env_keys::TIMEOUT_SECS, "3"),
            (env_keys::MISSING_ID, "424242"),
            (env_keys::DELETE_MESSAGE, ""),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.latency_budget, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.missing_post_id, 424_242);
        assert_eq!(config.delete_message, None);
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = ApiConfig::from_lookup(lookup_from(&[(env_keys::LATENCY_BUDGET_MS, "fast")]))
            .unwrap_err();
        assert!(err.to_string().contains(env_keys::LATENCY_BUDGET_MS));

        let err = ApiConfig::from_lookup(lookup_from(&[(env_keys::TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }
}
