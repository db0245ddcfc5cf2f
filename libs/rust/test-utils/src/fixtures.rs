//! Sample payloads for posts API tests.

use posts_contract::{NewPost, PostUpdate};
use serde_json::{Value, json};

/// Creation payload from the "new post" scenario.
#[must_use]
pub fn new_post_scenario() -> NewPost {
    NewPost::new("New Post", "This is the content of the new post.")
}

/// Update from the special-characters scenario.
#[must_use]
pub fn special_characters_update() -> PostUpdate {
    PostUpdate::new("!@#$%^&*()", "Check post format.")
}

/// Server representation of a post.
#[must_use]
pub fn post_json(id: u64, title: &str, body: &str) -> Value {
    json!({"id": id, "userId": 1, "title": title, "body": body})
}
