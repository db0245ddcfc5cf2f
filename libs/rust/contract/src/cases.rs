//! Catalogue of contract cases against the posts API.
//!
//! Each case performs its own request(s) and asserts one narrow contract.
//! Cases that need an existing post provision one through [`PostFixture`]
//! instead of assuming fixed ids on the server.

use crate::client::PostsClient;
use crate::error::ContractResult;
use crate::expectation::Expectation;
use crate::fixture::PostFixture;
use crate::model::{NewPost, PostId, PostUpdate};
use crate::response::TimedResponse;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

/// Special-character title that must round-trip unescaped.
pub const SPECIAL_TITLE: &str = "!@#$%^&*()";

/// API operation a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /posts`
    ListPosts,
    /// `GET /posts/{id}`
    GetPost,
    /// `GET /posts/{missing}`
    GetMissingPost,
    /// `GET /{invalid}`
    GetInvalidRoute,
    /// `POST /posts`
    CreatePost,
    /// `PUT /posts/{id}`
    ReplacePost,
    /// `PATCH /posts/{id}`
    PatchPost,
    /// `DELETE /posts/{id}`
    DeletePost,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ListPosts => "GET /posts",
            Self::GetPost => "GET /posts/{id}",
            Self::GetMissingPost => "GET /posts/{missing}",
            Self::GetInvalidRoute => "GET /{invalid}",
            Self::CreatePost => "POST /posts",
            Self::ReplacePost => "PUT /posts/{id}",
            Self::PatchPost => "PATCH /posts/{id}",
            Self::DeletePost => "DELETE /posts/{id}",
        };
        f.write_str(label)
    }
}

/// Every contract case, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractCase {
    /// `GET /posts` answers 200 with an array
    ListReturnsArray,
    /// `GET /posts` body parses as JSON, whatever its shape
    ListIsValidJson,
    /// `GET /posts` within the latency budget
    ListWithinLatency,
    /// `GET /posts/{id}` echoes the requested id
    GetReturnsRequestedId,
    /// `GET /posts/{id}` includes `title`
    GetIncludesTitle,
    /// `GET /posts/{id}` includes `body`
    GetIncludesBody,
    /// `GET /posts/{missing}` answers 404
    GetMissingReturnsNotFound,
    /// Unknown route answers 404
    InvalidRouteReturnsNotFound,
    /// `POST /posts` answers 201 with an id
    CreateReturnsId,
    /// `POST /posts` without body still answers 201
    CreateWithoutBody,
    /// `POST /posts` echoes title and body
    CreateEchoesFields,
    /// `POST /posts` within the latency budget
    CreateWithinLatency,
    /// `PUT` echoes the new title
    ReplaceTitle,
    /// `PUT` with only a body answers 200
    ReplaceWithoutTitle,
    /// `PUT` keeps special characters exact
    ReplaceSpecialCharacters,
    /// `PUT` echoes title and body
    ReplaceTitleAndBody,
    /// `PUT` answers with an object
    ReplaceReturnsObject,
    /// `PUT` within the latency budget
    ReplaceWithinLatency,
    /// `PATCH` of the title
    PatchTitle,
    /// `PATCH` of the body
    PatchBody,
    /// `PATCH` of title and body
    PatchTitleAndBody,
    /// `DELETE` then `GET` answers 404
    DeleteThenNotFound,
    /// `DELETE` answers with a confirmation message
    DeleteConfirms,
    /// `DELETE` within the latency budget
    DeleteWithinLatency,
}

impl ContractCase {
    /// All cases in catalogue order.
    pub const ALL: [Self; 24] = [
        Self::ListReturnsArray,
        Self::ListIsValidJson,
        Self::ListWithinLatency,
        Self::GetReturnsRequestedId,
        Self::GetIncludesTitle,
        Self::GetIncludesBody,
        Self::GetMissingReturnsNotFound,
        Self::InvalidRouteReturnsNotFound,
        Self::CreateReturnsId,
        Self::CreateWithoutBody,
        Self::CreateEchoesFields,
        Self::CreateWithinLatency,
        Self::ReplaceTitle,
        Self::ReplaceWithoutTitle,
        Self::ReplaceSpecialCharacters,
        Self::ReplaceTitleAndBody,
        Self::ReplaceReturnsObject,
        Self::ReplaceWithinLatency,
        Self::PatchTitle,
        Self::PatchBody,
        Self::PatchTitleAndBody,
        Self::DeleteThenNotFound,
        Self::DeleteConfirms,
        Self::DeleteWithinLatency,
    ];

    /// Stable `snake_case` name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListReturnsArray => "list_returns_array",
            Self::ListIsValidJson => "list_is_valid_json",
            Self::ListWithinLatency => "list_within_latency",
            Self::GetReturnsRequestedId => "get_returns_requested_id",
            Self::GetIncludesTitle => "get_includes_title",
            Self::GetIncludesBody => "get_includes_body",
            Self::GetMissingReturnsNotFound => "get_missing_returns_not_found",
            Self::InvalidRouteReturnsNotFound => "invalid_route_returns_not_found",
            Self::CreateReturnsId => "create_returns_id",
            Self::CreateWithoutBody => "create_without_body",
            Self::CreateEchoesFields => "create_echoes_fields",
            Self::CreateWithinLatency => "create_within_latency",
            Self::ReplaceTitle => "replace_title",
            Self::ReplaceWithoutTitle => "replace_without_title",
            Self::ReplaceSpecialCharacters => "replace_special_characters",
            Self::ReplaceTitleAndBody => "replace_title_and_body",
            Self::ReplaceReturnsObject => "replace_returns_object",
            Self::ReplaceWithinLatency => "replace_within_latency",
            Self::PatchTitle => "patch_title",
            Self::PatchBody => "patch_body",
            Self::PatchTitleAndBody => "patch_title_and_body",
            Self::DeleteThenNotFound => "delete_then_not_found",
            Self::DeleteConfirms => "delete_confirms",
            Self::DeleteWithinLatency => "delete_within_latency",
        }
    }

    /// Look a case up by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Operation the case exercises.
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::ListReturnsArray | Self::ListIsValidJson | Self::ListWithinLatency => Operation::ListPosts,
            Self::GetReturnsRequestedId | Self::GetIncludesTitle | Self::GetIncludesBody => Operation::GetPost,
            Self::GetMissingReturnsNotFound => Operation::GetMissingPost,
            Self::InvalidRouteReturnsNotFound => Operation::GetInvalidRoute,
            Self::CreateReturnsId
            | Self::CreateWithoutBody
            | Self::CreateEchoesFields
            | Self::CreateWithinLatency => Operation::CreatePost,
            Self::ReplaceTitle
            | Self::ReplaceWithoutTitle
            | Self::ReplaceSpecialCharacters
            | Self::ReplaceTitleAndBody
            | Self::ReplaceReturnsObject
            | Self::ReplaceWithinLatency => Operation::ReplacePost,
            Self::PatchTitle | Self::PatchBody | Self::PatchTitleAndBody => Operation::PatchPost,
            Self::DeleteThenNotFound | Self::DeleteConfirms | Self::DeleteWithinLatency => Operation::DeletePost,
        }
    }

    /// Whether the case provisions its own post.
    #[must_use]
    pub const fn needs_fixture(self) -> bool {
        matches!(
            self.operation(),
            Operation::GetPost | Operation::ReplacePost | Operation::PatchPost | Operation::DeletePost
        )
    }

    /// Execute the case.
    ///
    /// # Errors
    ///
    /// Returns the transport failure or every broken contract clause.
    pub async fn run(self, client: &PostsClient) -> ContractResult<()> {
        match self {
            Self::ListReturnsArray => list_is_array(client).await,
            Self::ListIsValidJson => list_is_json(client).await,
            Self::ListWithinLatency => list_within_latency(client).await,
            Self::GetReturnsRequestedId => with_fixture(client, get_returns_requested_id).await,
            Self::GetIncludesTitle => with_fixture(client, get_includes_title).await,
            Self::GetIncludesBody => with_fixture(client, get_includes_body).await,
            Self::GetMissingReturnsNotFound => get_missing_returns_not_found(client).await,
            Self::InvalidRouteReturnsNotFound => invalid_route_returns_not_found(client).await,
            Self::CreateReturnsId => {
                let post = NewPost::new("New Post", "This is the content of the new post.");
                create(client, &post, Expectation::created().object_body().field_non_null("id")).await
            }
            Self::CreateWithoutBody => {
                let post = NewPost {
                    user_id: Some(145),
                    title: Some("Post without Body".to_string()),
                    body: None,
                };
                create(client, &post, Expectation::created()).await
            }
            Self::CreateEchoesFields => {
                let post = NewPost::new("New Post Title for test", "This is the body of the new post for test!.")
                    .with_user_id(1);
                let expectation = Expectation::created()
                    .object_body()
                    .field_eq_opt("title", post.title.as_deref())
                    .field_eq_opt("body", post.body.as_deref());
                create(client, &post, expectation).await
            }
            Self::CreateWithinLatency => {
                let post = NewPost::new("Response Time Check", "Checking response time.").with_user_id(1);
                let budget = client.config().latency_budget;
                create(client, &post, Expectation::created().within(budget)).await
            }
            Self::ReplaceTitle => with_fixture(client, replace_title).await,
            Self::ReplaceWithoutTitle => with_fixture(client, replace_without_title).await,
            Self::ReplaceSpecialCharacters => with_fixture(client, replace_special_characters).await,
            Self::ReplaceTitleAndBody => with_fixture(client, replace_title_and_body).await,
            Self::ReplaceReturnsObject => with_fixture(client, replace_returns_object).await,
            Self::ReplaceWithinLatency => with_fixture(client, replace_within_latency).await,
            Self::PatchTitle => with_fixture(client, patch_title).await,
            Self::PatchBody => with_fixture(client, patch_body).await,
            Self::PatchTitleAndBody => with_fixture(client, patch_title_and_body).await,
            Self::DeleteThenNotFound => with_fixture(client, delete_then_not_found).await,
            Self::DeleteConfirms => with_fixture(client, delete_confirms).await,
            Self::DeleteWithinLatency => with_fixture(client, delete_within_latency).await,
        }
    }
}

impl fmt::Display for ContractCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seed used for provisioned posts, with a title unique to each call.
#[must_use]
pub fn fixture_seed() -> NewPost {
    NewPost::new(
        format!("Contract fixture {}", Uuid::new_v4()),
        "Provisioned for a single contract case.",
    )
    .with_user_id(1)
}

async fn with_fixture<'a, F, Fut>(client: &'a PostsClient, case: F) -> ContractResult<()>
where
    F: FnOnce(&'a PostsClient, PostId) -> Fut,
    Fut: Future<Output = ContractResult<()>> + 'a,
{
    let seed = fixture_seed();
    PostFixture::scoped(client, &seed, case).await
}

// Collection

async fn list_is_array(client: &PostsClient) -> ContractResult<()> {
    let response = client.list_posts().await?;
    Expectation::ok().array_body().verify(&response)
}

async fn list_is_json(client: &PostsClient) -> ContractResult<()> {
    let response = client.list_posts().await?;
    Expectation::ok().any_json_body().verify(&response)
}

async fn list_within_latency(client: &PostsClient) -> ContractResult<()> {
    let response = client.list_posts().await?;
    Expectation::ok()
        .within(client.config().latency_budget)
        .verify(&response)
}

// Single post

async fn get_returns_requested_id(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let response = client.get_post(id).await?;
    Expectation::ok()
        .object_body()
        .with_fields(["id", "title", "body"])
        .id_eq(id)
        .verify(&response)
}

async fn get_includes_title(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let response = client.get_post(id).await?;
    Expectation::ok().object_body().with_fields(["title"]).verify(&response)
}

async fn get_includes_body(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let response = client.get_post(id).await?;
    Expectation::ok().object_body().with_fields(["body"]).verify(&response)
}

async fn get_missing_returns_not_found(client: &PostsClient) -> ContractResult<()> {
    let response = client.get_post(PostId(client.config().missing_post_id)).await?;
    Expectation::not_found().verify(&response)
}

async fn invalid_route_returns_not_found(client: &PostsClient) -> ContractResult<()> {
    let response = client.get(&client.config().invalid_path).await?;
    Expectation::not_found().verify(&response)
}

// Create

async fn create(client: &PostsClient, post: &NewPost, expectation: Expectation) -> ContractResult<()> {
    let response = client.create_post(post).await?;
    let verdict = expectation.verify(&response);
    discard_created(client, &response).await;
    verdict
}

/// Best-effort removal of a post a create case left behind.
async fn discard_created(client: &PostsClient, response: &TimedResponse) {
    let Some(id) = response.post_id() else {
        return;
    };
    if let Err(e) = client.delete_post(id).await {
        warn!(%id, error = %e, "Failed to discard created post");
    }
}

// Full update

async fn replace(client: &PostsClient, id: PostId, update: &PostUpdate, expectation: Expectation) -> ContractResult<()> {
    let response = client.replace_post(id, update).await?;
    expectation.verify(&response)
}

async fn replace_title(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new("Updated Title", "This is a new post.");
    let expectation = Expectation::ok().field_eq_opt("title", update.title.as_deref());
    replace(client, id, &update, expectation).await
}

async fn replace_without_title(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::body("Updated body without title.");
    replace(client, id, &update, Expectation::ok()).await
}

async fn replace_special_characters(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new(SPECIAL_TITLE, "Check post format.");
    let expectation = Expectation::ok()
        .field_eq_opt("title", update.title.as_deref())
        .field_eq_opt("body", update.body.as_deref());
    replace(client, id, &update, expectation).await
}

async fn replace_title_and_body(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new("Updated Title", "Updated content of the post.");
    let expectation = Expectation::ok()
        .field_eq_opt("title", update.title.as_deref())
        .field_eq_opt("body", update.body.as_deref());
    replace(client, id, &update, expectation).await
}

async fn replace_returns_object(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new("Updated Title", "This is an updated post.");
    replace(client, id, &update, Expectation::ok().object_body()).await
}

async fn replace_within_latency(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new("Updated Title", "This is an updated post.");
    let expectation = Expectation::ok().within(client.config().latency_budget);
    replace(client, id, &update, expectation).await
}

// Partial update

async fn patch_title(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::title("Partially Updated Title");
    let response = client.patch_post(id, &update).await?;
    Expectation::ok()
        .field_eq_opt("title", update.title.as_deref())
        .verify(&response)
}

async fn patch_body(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::body("Partially updated body of the post.");
    let response = client.patch_post(id, &update).await?;
    Expectation::ok().field_truthy("body").verify(&response)
}

async fn patch_title_and_body(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let update = PostUpdate::new("Partially Updated Title", "Partially updated content of the post.");
    let response = client.patch_post(id, &update).await?;
    Expectation::ok()
        .field_eq_opt("title", update.title.as_deref())
        .field_truthy("body")
        .verify(&response)
}

// Delete

async fn delete_then_not_found(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let deleted = client.delete_post(id).await?;
    Expectation::ok().verify(&deleted)?;

    let lookup = client.get_post(id).await?;
    Expectation::not_found().verify(&lookup)
}

async fn delete_confirms(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let response = client.delete_post(id).await?;
    let expectation = match &client.config().delete_message {
        Some(message) => Expectation::ok().object_body().field_eq("message", message.as_str()),
        None => Expectation::ok().object_body().field_truthy("message"),
    };
    expectation.verify(&response)
}

async fn delete_within_latency(client: &PostsClient, id: PostId) -> ContractResult<()> {
    let response = client.delete_post(id).await?;
    Expectation::ok()
        .within(client.config().latency_budget)
        .verify(&response)
}
