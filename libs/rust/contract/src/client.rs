//! Timed HTTP client for the posts API.

use crate::model::{NewPost, PostId, PostUpdate};
use crate::response::TimedResponse;
use posts_common::{ApiConfig, ClientResult, build_http_client};
use reqwest::{Client, Method};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Posts API client that records the round-trip time of every call.
///
/// No retries: each call performs exactly one request.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: Client,
    config: ApiConfig,
}

impl PostsClient {
    /// Create a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /posts`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn list_posts(&self) -> ClientResult<TimedResponse> {
        self.get("/posts").await
    }

    /// `GET /posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn get_post(&self, id: PostId) -> ClientResult<TimedResponse> {
        self.get(&format!("/posts/{id}")).await
    }

    /// `POST /posts`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_post(&self, post: &NewPost) -> ClientResult<TimedResponse> {
        self.send_json(Method::POST, "/posts", post).await
    }

    /// `PUT /posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn replace_post(&self, id: PostId, update: &PostUpdate) -> ClientResult<TimedResponse> {
        self.send_json(Method::PUT, &format!("/posts/{id}"), update).await
    }

    /// `PATCH /posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn patch_post(&self, id: PostId, update: &PostUpdate) -> ClientResult<TimedResponse> {
        self.send_json(Method::PATCH, &format!("/posts/{id}"), update).await
    }

    /// `DELETE /posts/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn delete_post(&self, id: PostId) -> ClientResult<TimedResponse> {
        self.exchange(Method::DELETE, &format!("/posts/{id}"), None).await
    }

    /// `GET` an arbitrary path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn get(&self, path: &str) -> ClientResult<TimedResponse> {
        self.exchange(Method::GET, path, None).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> ClientResult<TimedResponse> {
        let body = serde_json::to_vec(payload)?;
        self.exchange(method, path, Some(body)).await
    }

    #[instrument(skip(self, body), fields(base = %self.config.base_url))]
    async fn exchange(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ClientResult<TimedResponse> {
        let mut request = self.http.request(method.clone(), self.config.url_for(path));
        if let Some(bytes) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "Exchange complete"
        );

        Ok(TimedResponse::new(method, path, status, text, elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> PostsClient {
        PostsClient::new(ApiConfig::new(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_get_post_records_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 2, "title": "t", "body": "b"
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server).await.get_post(PostId(2)).await.unwrap();
        assert_eq!(resp.status.as_u16(), 200);
        assert_eq!(resp.post_id(), Some(PostId(2)));
        assert_eq!(resp.path, "/posts/2");
    }

    #[tokio::test]
    async fn test_create_sends_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"title": "New Post", "body": "b"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server)
            .await
            .create_post(&NewPost::new("New Post", "b"))
            .await
            .unwrap();
        assert_eq!(resp.status.as_u16(), 201);
        assert_eq!(resp.post_id(), Some(PostId(7)));
    }

    #[tokio::test]
    async fn test_updates_send_json_content_type() {
        let server = MockServer::start().await;
        let update = PostUpdate::new("Updated Title", "Updated content of the post.");
        for verb in ["PUT", "PATCH"] {
            Mock::given(method(verb))
                .and(path("/posts/3"))
                .and(header("content-type", "application/json"))
                .and(body_json(serde_json::json!({
                    "title": "Updated Title",
                    "body": "Updated content of the post."
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 3})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server).await;
        let replaced = client.replace_post(PostId(3), &update).await.unwrap();
        let patched = client.patch_post(PostId(3), &update).await.unwrap();
        assert_eq!(replaced.status.as_u16(), 200);
        assert_eq!(replaced.method, Method::PUT);
        assert_eq!(patched.status.as_u16(), 200);
        assert_eq!(patched.method, Method::PATCH);
    }

    #[tokio::test]
    async fn test_sends_suite_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(header("user-agent", posts_common::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).await.list_posts().await.unwrap();
        assert_eq!(resp.status.as_u16(), 200);
    }

    #[tokio::test]
    async fn test_request_timeout_comes_from_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = ApiConfig::new(&server.uri())
            .unwrap()
            .with_request_timeout(std::time::Duration::from_millis(200));
        let result = PostsClient::new(config).unwrap().list_posts().await;
        assert!(matches!(result, Err(posts_common::ClientError::Http(e)) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_elapsed_includes_server_delay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let resp = client_for(&server).await.list_posts().await.unwrap();
        assert!(resp.elapsed >= std::time::Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_client_error() {
        let config = ApiConfig::new("http://127.0.0.1:1")
            .unwrap()
            .with_request_timeout(std::time::Duration::from_secs(1));
        let result = PostsClient::new(config).unwrap().list_posts().await;
        assert!(matches!(result, Err(posts_common::ClientError::Http(_))));
    }
}
