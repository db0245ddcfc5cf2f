//! Post resource as the suite understands it.
//!
//! The suite never owns a post; these types only describe what it sends and
//! what it expects to read back.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned post identifier.
///
/// Deserializes from a JSON number or a numeric string, since some servers
/// echo identifiers as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    /// Read an identifier out of an arbitrary JSON value.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_number)).map(Self),
            serde_json::Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PostIdVisitor;

        impl Visitor<'_> for PostIdVisitor {
            type Value = PostId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or numeric string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PostId, E> {
                Ok(PostId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PostId, E> {
                u64::try_from(v)
                    .map(PostId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<PostId, E> {
                whole_number(v)
                    .map(PostId)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PostId, E> {
                v.trim()
                    .parse()
                    .map(PostId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(PostIdVisitor)
    }
}

/// `2.0` reads as `2`; fractional, negative or out-of-range values do not.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn whole_number(v: f64) -> Option<u64> {
    (v.fract() == 0.0 && v >= 0.0 && v < u64::MAX as f64).then_some(v as u64)
}

/// A post as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Identifier
    pub id: PostId,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Body text
    #[serde(default)]
    pub body: Option<String>,
    /// Owning user
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// Creation payload. Absent fields are omitted from the wire, not sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    /// Owning user
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    /// Title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NewPost {
    /// Payload with a title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id: None,
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Set the owning user.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Drop the body.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }
}

/// Full (PUT) or partial (PATCH) update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostUpdate {
    /// Update both title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Update only the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    /// Update only the body.
    #[must_use]
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }

    /// Whether the payload carries no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}
