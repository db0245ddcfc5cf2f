//! Explicit post provisioning: create, operate, clean up.

use crate::client::PostsClient;
use crate::error::{ContractResult, Violation};
use crate::expectation::Expectation;
use crate::model::{NewPost, PostId};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// A post created for the duration of one case.
///
/// Release is explicit since cleanup needs an async round trip.
#[derive(Debug)]
#[must_use = "a provisioned post should be released"]
pub struct PostFixture {
    id: PostId,
}

impl PostFixture {
    /// Create a post and read back its identifier.
    ///
    /// # Errors
    ///
    /// Fails when the server does not answer `201` with a readable `id`.
    pub async fn provision(client: &PostsClient, seed: &NewPost) -> ContractResult<Self> {
        let response = client.create_post(seed).await?;
        Expectation::created().object_body().verify(&response)?;

        let id = response.post_id().ok_or_else(|| {
            let actual = response
                .field("id")
                .map_or_else(|| "nothing".to_string(), ToString::to_string);
            response.fail(vec![Violation::FieldMismatch {
                field: "id".to_string(),
                expected: "a post identifier".to_string(),
                actual,
            }])
        })?;

        debug!(%id, "Provisioned post fixture");
        Ok(Self { id })
    }

    /// Identifier of the provisioned post.
    #[must_use]
    pub const fn id(&self) -> PostId {
        self.id
    }

    /// Delete the post. A `404` counts as already released.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or any other status than `200`/`404`.
    pub async fn release(self, client: &PostsClient) -> ContractResult<()> {
        let response = client.delete_post(self.id).await?;
        match response.status {
            StatusCode::OK | StatusCode::NOT_FOUND => {
                debug!(id = %self.id, status = response.status.as_u16(), "Released post fixture");
                Ok(())
            }
            other => Err(response.fail(vec![Violation::UnexpectedStatus {
                expected: StatusCode::OK.as_u16(),
                actual: other.as_u16(),
            }])),
        }
    }

    /// Run `case` against a fresh fixture and release it afterwards.
    ///
    /// The case result wins; a failed release is only logged.
    ///
    /// # Errors
    ///
    /// Fails when provisioning fails or the case itself fails.
    pub async fn scoped<'a, F, Fut>(client: &'a PostsClient, seed: &NewPost, case: F) -> ContractResult<()>
    where
        F: FnOnce(&'a PostsClient, PostId) -> Fut,
        Fut: Future<Output = ContractResult<()>> + 'a,
    {
        let fixture = Self::provision(client, seed).await?;
        let id = fixture.id();
        let outcome = case(client, id).await;
        if let Err(e) = fixture.release(client).await {
            warn!(%id, error = %e, "Failed to release post fixture");
        }
        outcome
    }
}
