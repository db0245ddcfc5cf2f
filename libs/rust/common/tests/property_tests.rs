//! Property-based tests for the shared client settings.

use posts_common::ApiConfig;
use posts_common::config::env_keys;
use proptest::prelude::*;
use std::time::Duration;

fn base_url_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z][a-z0-9]{0,15}(\\.[a-z]{2,5})?",
        proptest::option::of(1024u16..65535),
        "(/[a-z0-9]{1,8}){0,2}",
        prop_oneof![Just(""), Just("/")],
    )
        .prop_map(|(scheme, host, port, prefix, trailing)| {
            let port = port.map(|p| format!(":{p}")).unwrap_or_default();
            format!("{scheme}://{host}{port}{prefix}{trailing}")
        })
}

fn path_strategy() -> impl Strategy<Value = String> {
    (prop_oneof![Just(""), Just("/")], "[a-z0-9]{1,10}(/[a-z0-9]{1,10}){0,3}")
        .prop_map(|(lead, rest)| format!("{lead}{rest}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Joining a base URL and a path never produces an empty segment,
    /// whether or not either side carries a slash.
    #[test]
    fn prop_url_for_has_single_separator(base in base_url_strategy(), path in path_strategy()) {
        let config = ApiConfig::new(&base).unwrap();
        let url = config.url_for(&path);
        let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap();

        prop_assert!(!after_scheme.contains("//"), "double slash in {}", url);
        prop_assert!(url.ends_with(path.trim_start_matches('/')));
        prop_assert!(!config.base_url.ends_with('/'));
    }

    /// Any non-negative budget in the environment is taken verbatim.
    #[test]
    fn prop_latency_budget_from_env(ms in 0u64..100_000) {
        let value = ms.to_string();
        let config = ApiConfig::from_lookup(|key| {
            (key == env_keys::LATENCY_BUDGET_MS).then(|| value.clone())
        })
        .unwrap();
        prop_assert_eq!(config.latency_budget, Duration::from_millis(ms));
    }

    /// Non-numeric budgets are rejected rather than defaulted.
    #[test]
    fn prop_non_numeric_budget_rejected(raw in "[a-z]{1,8}") {
        let result = ApiConfig::from_lookup(|key| {
            (key == env_keys::LATENCY_BUDGET_MS).then(|| raw.clone())
        });
        prop_assert!(result.is_err());
    }
}
