//! A response captured together with its round-trip time.

use crate::error::{BodyShape, ContractError, Violation};
use crate::model::{Post, PostId};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

const EXCERPT_CHARS: usize = 120;

/// One observed request/response exchange.
#[derive(Debug, Clone)]
pub struct TimedResponse {
    /// Request method
    pub method: Method,
    /// Request path relative to the base URL
    pub path: String,
    /// Response status
    pub status: StatusCode,
    /// Raw response body
    pub text: String,
    /// Parsed body, `None` when the body is not valid JSON
    pub json: Option<Value>,
    /// Time from sending the request until the body was fully read
    pub elapsed: Duration,
}

impl TimedResponse {
    /// Assemble a response, parsing the body as JSON when possible.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, status: StatusCode, text: String, elapsed: Duration) -> Self {
        let json = serde_json::from_str(&text).ok();
        Self {
            method,
            path: path.into(),
            status,
            text,
            json,
            elapsed,
        }
    }

    /// Parsed body or a `NotJson` violation.
    ///
    /// # Errors
    ///
    /// Returns the violation when the body did not parse.
    pub fn json_body(&self) -> Result<&Value, Violation> {
        self.json.as_ref().ok_or_else(|| Violation::NotJson {
            excerpt: self.text.chars().take(EXCERPT_CHARS).collect(),
        })
    }

    /// Top-level field of an object body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json.as_ref()?.as_object()?.get(name)
    }

    /// The `id` field read as a post identifier.
    #[must_use]
    pub fn post_id(&self) -> Option<PostId> {
        self.field("id").and_then(PostId::from_json)
    }

    /// The body read as a post, `None` when it is not one.
    #[must_use]
    pub fn post(&self) -> Option<Post> {
        self.json.clone().and_then(|v| serde_json::from_value(v).ok())
    }

    /// Shape of the parsed body, if it is an array or object.
    #[must_use]
    pub fn shape(&self) -> Option<BodyShape> {
        self.json.as_ref().and_then(BodyShape::of)
    }

    /// Wrap violations found on this response into a case failure.
    #[must_use]
    pub fn fail(&self, violations: Vec<Violation>) -> ContractError {
        ContractError::Violations {
            method: self.method.to_string(),
            path: self.path.clone(),
            violations,
        }
    }
}

/// JSON type name used in violation messages.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
