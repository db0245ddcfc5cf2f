//! Harness shared by the posts API contract tests.
//!
//! Live tests target the server named by `POSTS_API_BASE_URL`; when the
//! variable is unset they print a notice and pass without touching the network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use posts_common::config::env_keys;
use posts_common::{ApiConfig, TracingConfig, try_init_tracing};
use posts_contract::{ContractCase, ContractSuite};
use tokio::sync::{Mutex, MutexGuard};

static SEQUENTIAL: Mutex<()> = Mutex::const_new(());

/// Tracing settings for test binaries. A `format` of `json` switches to JSON lines.
#[must_use]
pub fn test_tracing_config(format: Option<&str>) -> TracingConfig {
    let config = TracingConfig::default().with_service_name("posts-contract-tests");
    if format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json")) {
        config.with_json_output()
    } else {
        config
    }
}

/// Install a test subscriber once per test binary.
pub fn init_test_tracing() {
    let format = std::env::var(env_keys::LOG_FORMAT).ok();
    let _ = try_init_tracing(&test_tracing_config(format.as_deref()));
}

/// Settings for the live server, or `None` when no server is configured.
///
/// # Errors
///
/// Returns an error when the environment is set but holds unusable values.
pub fn live_config() -> anyhow::Result<Option<ApiConfig>> {
    if std::env::var_os(env_keys::BASE_URL).is_none() {
        println!("{} not set, skipping live contract case", env_keys::BASE_URL);
        return Ok(None);
    }
    Ok(Some(ApiConfig::from_env()?))
}

/// Hold this guard for the duration of a case so cases never overlap,
/// even under the parallel test runner.
pub async fn sequential() -> MutexGuard<'static, ()> {
    SEQUENTIAL.lock().await
}

/// Run one case against the live server, failing with every violation found.
///
/// # Errors
///
/// Returns the case failure, or a configuration error.
pub async fn run_live_case(case: ContractCase) -> anyhow::Result<()> {
    init_test_tracing();
    let Some(config) = live_config()? else {
        return Ok(());
    };

    let _guard = sequential().await;
    let outcome = ContractSuite::new(config)?.run_case(case).await;
    match outcome.failure {
        None => Ok(()),
        Some(reason) => anyhow::bail!("{case}: {reason}"),
    }
}
