//! HTTP client construction.
//!
//! No retry or backoff layer is installed: every contract case observes
//! exactly one round trip.

use crate::config::ApiConfig;
use crate::error::ClientResult;
use reqwest::Client;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("posts-contract/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client for the given settings.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use posts_common::{ApiConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = ApiConfig::default().with_request_timeout(Duration::from_secs(2));
/// let client = build_http_client(&config).expect("Failed to build client");
/// # drop(client);
/// ```
pub fn build_http_client(config: &ApiConfig) -> ClientResult<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout)
        .user_agent(USER_AGENT)
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_the_suite() {
        assert!(USER_AGENT.starts_with("posts-contract/"));
    }

    #[test]
    fn test_build_client() {
        assert!(build_http_client(&ApiConfig::default()).is_ok());
    }
}
