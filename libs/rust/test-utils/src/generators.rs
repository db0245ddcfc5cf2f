//! Shared proptest generators for posts API types.

use posts_contract::{ContractCase, NewPost, PostId, PostUpdate};
use proptest::prelude::*;
use std::time::Duration;

/// Printable titles, including punctuation and non-ASCII text.
pub fn title_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 ]{1,40}",
        "[!@#$%^&*()_+={}|:;'<>,.?/~`-]{1,20}",
        "[\\PC]{1,30}",
    ]
}

/// Titles made only of punctuation that servers tend to escape.
pub fn special_title_strategy() -> impl Strategy<Value = String> {
    "[!@#$%^&*()<>\"']{1,16}"
}

/// Non-empty body text.
pub fn body_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,!?]{1,120}"
}

/// Post identifiers a server could plausibly assign.
pub fn post_id_strategy() -> impl Strategy<Value = PostId> {
    (1u64..1_000_000).prop_map(PostId)
}

/// Creation payloads with any subset of fields.
pub fn new_post_strategy() -> impl Strategy<Value = NewPost> {
    (
        proptest::option::of(1u64..1000),
        proptest::option::of(title_strategy()),
        proptest::option::of(body_strategy()),
    )
        .prop_map(|(user_id, title, body)| NewPost { user_id, title, body })
}

/// Update payloads carrying at least one field.
pub fn post_update_strategy() -> impl Strategy<Value = PostUpdate> {
    prop_oneof![
        (title_strategy(), body_strategy()).prop_map(|(t, b)| PostUpdate::new(t, b)),
        title_strategy().prop_map(PostUpdate::title),
        body_strategy().prop_map(PostUpdate::body),
    ]
}

/// Any case from the catalogue.
pub fn contract_case_strategy() -> impl Strategy<Value = ContractCase> {
    proptest::sample::select(ContractCase::ALL.to_vec())
}

/// Status codes a posts server may answer with.
pub fn http_status_code_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(200u16),
        Just(201u16),
        Just(204u16),
        Just(400u16),
        Just(404u16),
        Just(405u16),
        Just(500u16),
        Just(503u16),
    ]
}

/// Round-trip durations from instant to well past the default budget.
pub fn latency_strategy() -> impl Strategy<Value = Duration> {
    (0u64..2_000).prop_map(Duration::from_millis)
}
