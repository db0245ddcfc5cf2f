//! In-memory posts API served by wiremock.
//!
//! [`MockPostsApi`] behaves like a well-formed posts server and can be told
//! to misbehave through [`Faults`], so the suite's own checks can be tested.

use posts_common::{ApiConfig, ClientResult};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const ITEM_PATH: &str = r"^/posts/[^/]+$";

/// Deliberate deviations from the posts contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Faults {
    /// Delay added to every response
    pub latency: Option<Duration>,
    /// HTML-escape `title` and `body` in echoed posts
    pub escape_echoes: bool,
    /// Leave `id` out of creation responses
    pub omit_created_id: bool,
    /// Answer DELETE with 200 but keep the post
    pub keep_deleted: bool,
    /// Serve the collection as an object instead of an array
    pub list_as_object: bool,
    /// Confirmation message sent on DELETE
    pub delete_message: Option<String>,
}

impl Faults {
    /// Add a response delay.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[derive(Debug)]
struct PostStore {
    posts: BTreeMap<u64, Map<String, Value>>,
    next_id: u64,
    faults: Faults,
}

impl PostStore {
    fn seeded(count: u64) -> Self {
        let posts = (1..=count)
            .map(|id| {
                let mut post = Map::new();
                post.insert("id".to_string(), json!(id));
                post.insert("userId".to_string(), json!(1));
                post.insert("title".to_string(), json!(format!("Seeded post {id}")));
                post.insert("body".to_string(), json!(format!("Body of seeded post {id}.")));
                (id, post)
            })
            .collect();
        Self {
            posts,
            next_id: count + 1,
            faults: Faults::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Route {
    List,
    Get,
    Create,
    Replace,
    Patch,
    Delete,
}

struct PostsResponder {
    route: Route,
    store: Arc<Mutex<PostStore>>,
}

impl Respond for PostsResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut store = lock(&self.store);
        let template = match self.route {
            Route::List => list(&store),
            Route::Get => with_id(request, |id| get(&store, id)),
            Route::Create => with_payload(request, |payload| create(&mut store, payload)),
            Route::Replace | Route::Patch => with_id(request, |id| {
                with_payload(request, |payload| update(&mut store, id, payload))
            }),
            Route::Delete => with_id(request, |id| delete(&mut store, id)),
        };
        match store.faults.latency {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

fn lock(store: &Mutex<PostStore>) -> MutexGuard<'_, PostStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"error": "Post not found"}))
}

fn with_id(request: &Request, f: impl FnOnce(u64) -> ResponseTemplate) -> ResponseTemplate {
    request
        .url
        .path()
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .map_or_else(not_found, f)
}

fn with_payload(request: &Request, f: impl FnOnce(Map<String, Value>) -> ResponseTemplate) -> ResponseTemplate {
    match serde_json::from_slice::<Value>(&request.body) {
        Ok(Value::Object(payload)) => f(payload),
        _ => ResponseTemplate::new(400).set_body_json(json!({"error": "Expected a JSON object"})),
    }
}

fn echo(store: &PostStore, post: &Map<String, Value>) -> Value {
    let mut post = post.clone();
    if store.faults.escape_echoes {
        for key in ["title", "body"] {
            if let Some(Value::String(text)) = post.get_mut(key) {
                *text = escape_html(text);
            }
        }
    }
    Value::Object(post)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn list(store: &PostStore) -> ResponseTemplate {
    let posts: Vec<Value> = store.posts.values().map(|p| echo(store, p)).collect();
    let body = if store.faults.list_as_object {
        json!({"posts": posts})
    } else {
        Value::Array(posts)
    };
    ResponseTemplate::new(200).set_body_json(body)
}

fn get(store: &PostStore, id: u64) -> ResponseTemplate {
    store
        .posts
        .get(&id)
        .map_or_else(not_found, |post| ResponseTemplate::new(200).set_body_json(echo(store, post)))
}

fn create(store: &mut PostStore, payload: Map<String, Value>) -> ResponseTemplate {
    let id = store.next_id;
    store.next_id += 1;

    let mut post = payload;
    post.insert("id".to_string(), json!(id));
    store.posts.insert(id, post.clone());

    if store.faults.omit_created_id {
        post.remove("id");
    }
    ResponseTemplate::new(201).set_body_json(echo(store, &post))
}

fn update(store: &mut PostStore, id: u64, payload: Map<String, Value>) -> ResponseTemplate {
    let Some(post) = store.posts.get_mut(&id) else {
        return not_found();
    };
    for (key, value) in payload {
        if key != "id" {
            post.insert(key, value);
        }
    }
    let post = post.clone();
    ResponseTemplate::new(200).set_body_json(echo(store, &post))
}

fn delete(store: &mut PostStore, id: u64) -> ResponseTemplate {
    let existed = if store.faults.keep_deleted {
        store.posts.contains_key(&id)
    } else {
        store.posts.remove(&id).is_some()
    };
    if !existed {
        return not_found();
    }
    let message = store
        .faults
        .delete_message
        .clone()
        .unwrap_or_else(|| "Post deleted".to_string());
    ResponseTemplate::new(200).set_body_json(json!({"message": message}))
}

/// A running in-memory posts API.
pub struct MockPostsApi {
    server: MockServer,
    store: Arc<Mutex<PostStore>>,
}

impl MockPostsApi {
    /// Start a server holding `seed_count` posts with ids `1..=seed_count`.
    pub async fn start(seed_count: u64) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(Mutex::new(PostStore::seeded(seed_count)));

        let routes = [
            ("GET", Route::List, false),
            ("GET", Route::Get, true),
            ("POST", Route::Create, false),
            ("PUT", Route::Replace, true),
            ("PATCH", Route::Patch, true),
            ("DELETE", Route::Delete, true),
        ];
        for (verb, route, item) in routes {
            let responder = PostsResponder {
                route,
                store: Arc::clone(&store),
            };
            let mock = if item {
                Mock::given(method(verb)).and(path_regex(ITEM_PATH))
            } else {
                Mock::given(method(verb)).and(path("/posts"))
            };
            mock.respond_with(responder).mount(&server).await;
        }

        Self { server, store }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Settings pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URI does not parse, which wiremock never produces.
    pub fn config(&self) -> ClientResult<ApiConfig> {
        ApiConfig::new(&self.uri())
    }

    /// Replace the active faults.
    pub fn set_faults(&self, faults: Faults) {
        lock(&self.store).faults = faults;
    }

    /// Number of stored posts.
    #[must_use]
    pub fn post_count(&self) -> usize {
        lock(&self.store).posts.len()
    }

    /// Whether a post is stored.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        lock(&self.store).posts.contains_key(&id)
    }

    /// Stored representation of a post.
    #[must_use]
    pub fn post(&self, id: u64) -> Option<Value> {
        lock(&self.store).posts.get(&id).cloned().map(Value::Object)
    }

    /// Requests received so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posts_contract::{NewPost, PostId, PostUpdate, PostsClient};

    async fn client_for(api: &MockPostsApi) -> PostsClient {
        PostsClient::new(api.config().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_collection() {
        let api = MockPostsApi::start(3).await;
        let client = client_for(&api).await;

        let resp = client.list_posts().await.unwrap();
        assert_eq!(resp.status.as_u16(), 200);
        assert_eq!(resp.json.as_ref().and_then(Value::as_array).map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_create_update_delete_lifecycle() {
        let api = MockPostsApi::start(0).await;
        let client = client_for(&api).await;

        let created = client.create_post(&NewPost::new("t", "b")).await.unwrap();
        assert_eq!(created.status.as_u16(), 201);
        let id = created.post_id().unwrap();
        assert!(api.contains(id.0));

        let patched = client.patch_post(id, &PostUpdate::title("t2")).await.unwrap();
        assert_eq!(patched.field("title"), Some(&json!("t2")));
        assert_eq!(patched.field("body"), Some(&json!("b")));

        let deleted = client.delete_post(id).await.unwrap();
        assert_eq!(deleted.field("message"), Some(&json!("Post deleted")));
        assert_eq!(client.get_post(id).await.unwrap().status.as_u16(), 404);
        assert_eq!(api.post_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_route_and_bad_id() {
        let api = MockPostsApi::start(1).await;
        let client = client_for(&api).await;

        assert_eq!(client.get("/invalidendpoint").await.unwrap().status.as_u16(), 404);
        assert_eq!(client.get("/posts/abc").await.unwrap().status.as_u16(), 404);
        assert_eq!(client.get_post(PostId(9999)).await.unwrap().status.as_u16(), 404);
    }

    #[tokio::test]
    async fn test_escape_fault() {
        let api = MockPostsApi::start(0).await;
        api.set_faults(Faults {
            escape_echoes: true,
            ..Faults::default()
        });
        let client = client_for(&api).await;

        let created = client.create_post(&NewPost::new("a&b", "<p>")).await.unwrap();
        assert_eq!(created.field("title"), Some(&json!("a&amp;b")));
        assert_eq!(created.field("body"), Some(&json!("&lt;p&gt;")));
        assert_eq!(api.received_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_keep_deleted_fault() {
        let api = MockPostsApi::start(2).await;
        api.set_faults(Faults {
            keep_deleted: true,
            ..Faults::default()
        });
        let client = client_for(&api).await;

        assert_eq!(client.delete_post(PostId(2)).await.unwrap().status.as_u16(), 200);
        assert!(api.contains(2));
    }
}
