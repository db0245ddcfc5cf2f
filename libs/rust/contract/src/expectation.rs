//! Declarative response contracts.
//!
//! An [`Expectation`] lists what a response must satisfy. [`Expectation::verify`]
//! checks every clause and reports all broken ones together.

use crate::error::{BodyShape, ContractError, Violation};
use crate::model::PostId;
use crate::response::{TimedResponse, json_type_name};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// A check on one top-level field of an object body.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCheck {
    /// Field must be present (any value, including `null`)
    Present(String),
    /// Field must equal the value exactly
    Equals(String, Value),
    /// Field must be present and not `null`
    NonNull(String),
    /// Field must be present and truthy
    Truthy(String),
    /// Field must read as the given identifier (number or numeric string)
    IdEquals(String, PostId),
}

impl FieldCheck {
    fn field(&self) -> &str {
        match self {
            Self::Present(f)
            | Self::Equals(f, _)
            | Self::NonNull(f)
            | Self::Truthy(f)
            | Self::IdEquals(f, _) => f,
        }
    }

    fn check(&self, value: Option<&Value>) -> Option<Violation> {
        let field = self.field().to_string();
        let Some(value) = value else {
            return Some(Violation::MissingField { field });
        };
        match self {
            Self::Present(_) => None,
            Self::Equals(_, expected) => (value != expected).then(|| Violation::FieldMismatch {
                field,
                expected: expected.to_string(),
                actual: value.to_string(),
            }),
            Self::NonNull(_) => value.is_null().then(|| Violation::FieldMismatch {
                field,
                expected: "a non-null value".to_string(),
                actual: value.to_string(),
            }),
            Self::Truthy(_) => (!is_truthy(value)).then(|| Violation::FalsyField {
                field,
                actual: value.to_string(),
            }),
            Self::IdEquals(_, expected) => (PostId::from_json(value) != Some(*expected)).then(|| {
                Violation::FieldMismatch {
                    field,
                    expected: expected.to_string(),
                    actual: value.to_string(),
                }
            }),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Expected status, body shape, fields and latency for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    status: StatusCode,
    require_json: bool,
    shape: Option<BodyShape>,
    fields: Vec<FieldCheck>,
    latency_budget: Option<Duration>,
}

impl Expectation {
    /// Expect the given status and nothing else yet.
    #[must_use]
    pub const fn status(status: StatusCode) -> Self {
        Self {
            status,
            require_json: false,
            shape: None,
            fields: Vec::new(),
            latency_budget: None,
        }
    }

    /// `200 OK`
    #[must_use]
    pub const fn ok() -> Self {
        Self::status(StatusCode::OK)
    }

    /// `201 Created`
    #[must_use]
    pub const fn created() -> Self {
        Self::status(StatusCode::CREATED)
    }

    /// `404 Not Found`
    #[must_use]
    pub const fn not_found() -> Self {
        Self::status(StatusCode::NOT_FOUND)
    }

    /// Require a body that parses as JSON, of any shape.
    #[must_use]
    pub const fn any_json_body(mut self) -> Self {
        self.require_json = true;
        self
    }

    /// Require a JSON array body.
    #[must_use]
    pub const fn array_body(mut self) -> Self {
        self.shape = Some(BodyShape::Array);
        self
    }

    /// Require a JSON object body.
    #[must_use]
    pub const fn object_body(mut self) -> Self {
        self.shape = Some(BodyShape::Object);
        self
    }

    /// Require each named field to be present.
    #[must_use]
    pub fn with_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .extend(names.into_iter().map(|n| FieldCheck::Present(n.into())));
        self
    }

    /// Require a field to equal a value exactly.
    #[must_use]
    pub fn field_eq(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(FieldCheck::Equals(name.into(), value.into()));
        self
    }

    /// Require a field to equal the value when one is given; no-op for `None`.
    #[must_use]
    pub fn field_eq_opt(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field_eq(name, v),
            None => self,
        }
    }

    /// Require a field to be present and not `null`.
    #[must_use]
    pub fn field_non_null(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldCheck::NonNull(name.into()));
        self
    }

    /// Require a field to be truthy.
    #[must_use]
    pub fn field_truthy(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldCheck::Truthy(name.into()));
        self
    }

    /// Require the `id` field to identify the given post.
    #[must_use]
    pub fn id_eq(mut self, id: PostId) -> Self {
        self.fields.push(FieldCheck::IdEquals("id".to_string(), id));
        self
    }

    /// Require the round trip to finish strictly within the budget.
    #[must_use]
    pub const fn within(mut self, budget: Duration) -> Self {
        self.latency_budget = Some(budget);
        self
    }

    /// Every broken clause, in declaration order.
    #[must_use]
    pub fn violations(&self, response: &TimedResponse) -> Vec<Violation> {
        let mut violations = Vec::new();

        if response.status != self.status {
            violations.push(Violation::UnexpectedStatus {
                expected: self.status.as_u16(),
                actual: response.status.as_u16(),
            });
        }

        if self.require_json || self.shape.is_some() || !self.fields.is_empty() {
            match response.json_body() {
                Err(not_json) => violations.push(not_json),
                Ok(body) => {
                    if let Some(expected) = self.shape.filter(|s| BodyShape::of(body) != Some(*s)) {
                        violations.push(Violation::WrongShape {
                            expected,
                            actual: json_type_name(body).to_string(),
                        });
                    }
                    let object = body.as_object();
                    violations.extend(
                        self.fields
                            .iter()
                            .filter_map(|check| check.check(object.and_then(|o| o.get(check.field())))),
                    );
                }
            }
        }

        if let Some(budget) = self.latency_budget.filter(|b| response.elapsed >= *b) {
            violations.push(Violation::LatencyExceeded {
                elapsed: response.elapsed,
                budget,
            });
        }

        violations
    }

    /// Check the response against every clause.
    ///
    /// # Errors
    ///
    /// Returns all violations at once when any clause is broken.
    pub fn verify(&self, response: &TimedResponse) -> Result<(), ContractError> {
        let violations = self.violations(response);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(response.fail(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;

    fn response(status: u16, body: &Value, elapsed_ms: u64) -> TimedResponse {
        TimedResponse::new(
            Method::GET,
            "/posts/2",
            StatusCode::from_u16(status).unwrap(),
            body.to_string(),
            Duration::from_millis(elapsed_ms),
        )
    }

    #[test]
    fn test_matching_response_passes() {
        let resp = response(200, &json!({"id": 2, "title": "t", "body": "b"}), 10);
        let expectation = Expectation::ok()
            .object_body()
            .with_fields(["id", "title", "body"])
            .id_eq(PostId(2))
            .within(Duration::from_millis(500));
        assert!(expectation.verify(&resp).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let resp = response(201, &json!([1, 2]), 700);
        let expectation = Expectation::ok()
            .object_body()
            .with_fields(["id"])
            .within(Duration::from_millis(500));

        let violations = expectation.violations(&resp);
        assert_eq!(violations.len(), 4);
        assert!(matches!(violations[0], Violation::UnexpectedStatus { expected: 200, actual: 201 }));
        assert!(matches!(violations[1], Violation::WrongShape { .. }));
        assert!(matches!(violations[2], Violation::MissingField { .. }));
        assert!(matches!(violations[3], Violation::LatencyExceeded { .. }));
    }

    #[test]
    fn test_status_only_ignores_body() {
        let resp = TimedResponse::new(
            Method::GET,
            "/invalidendpoint",
            StatusCode::NOT_FOUND,
            "<h1>Not Found</h1>".to_string(),
            Duration::from_millis(3),
        );
        assert!(Expectation::not_found().verify(&resp).is_ok());
    }

    #[test]
    fn test_field_requirements_need_json() {
        let resp = TimedResponse::new(
            Method::GET,
            "/posts",
            StatusCode::OK,
            "plain".to_string(),
            Duration::ZERO,
        );
        let violations = Expectation::ok().array_body().violations(&resp);
        assert!(matches!(violations.as_slice(), [Violation::NotJson { .. }]));
    }

    #[test]
    fn test_any_json_body_ignores_shape() {
        let object = response(200, &json!({"posts": []}), 1);
        assert!(Expectation::ok().any_json_body().verify(&object).is_ok());
        assert!(Expectation::ok().array_body().verify(&object).is_err());

        let truncated = TimedResponse::new(
            Method::GET,
            "/posts",
            StatusCode::OK,
            "[{\"id\": 1".to_string(),
            Duration::ZERO,
        );
        let violations = Expectation::ok().any_json_body().violations(&truncated);
        assert!(matches!(violations.as_slice(), [Violation::NotJson { .. }]));
    }

    #[test]
    fn test_id_accepts_numeric_string() {
        let resp = response(200, &json!({"id": "2"}), 1);
        assert!(Expectation::ok().id_eq(PostId(2)).verify(&resp).is_ok());
        assert!(Expectation::ok().id_eq(PostId(3)).verify(&resp).is_err());
    }

    #[test]
    fn test_id_accepts_whole_float() {
        let resp = response(200, &json!({"id": 2.0}), 1);
        assert!(Expectation::ok().id_eq(PostId(2)).verify(&resp).is_ok());

        let resp = response(200, &json!({"id": 2.5}), 1);
        let err = Expectation::ok().id_eq(PostId(2)).verify(&resp).unwrap_err();
        assert!(matches!(err.violations(), [Violation::FieldMismatch { .. }]));
    }

    #[test]
    fn test_exact_equality_keeps_special_characters() {
        let resp = response(200, &json!({"title": "!@#$%^&*()"}), 1);
        assert!(Expectation::ok().field_eq("title", "!@#$%^&*()").verify(&resp).is_ok());

        let escaped = response(200, &json!({"title": "!@#$%^&amp;*()"}), 1);
        let err = Expectation::ok()
            .field_eq("title", "!@#$%^&*()")
            .verify(&escaped)
            .unwrap_err();
        assert!(matches!(err.violations(), [Violation::FieldMismatch { .. }]));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));

        let resp = response(200, &json!({"body": ""}), 1);
        let err = Expectation::ok().field_truthy("body").verify(&resp).unwrap_err();
        assert!(matches!(err.violations(), [Violation::FalsyField { .. }]));
    }

    #[test]
    fn test_latency_bound_is_strict() {
        let resp = response(200, &json!([]), 500);
        let err = Expectation::ok()
            .within(Duration::from_millis(500))
            .verify(&resp)
            .unwrap_err();
        assert!(matches!(err.violations(), [Violation::LatencyExceeded { .. }]));
    }

    #[test]
    fn test_non_null_field() {
        let resp = response(201, &json!({"id": null}), 1);
        let err = Expectation::created().field_non_null("id").verify(&resp).unwrap_err();
        assert!(matches!(err.violations(), [Violation::FieldMismatch { .. }]));

        let resp = response(201, &json!({"id": 0}), 1);
        assert!(Expectation::created().field_non_null("id").verify(&resp).is_ok());
    }

    #[test]
    fn test_field_eq_opt_skips_none() {
        let resp = response(201, &json!({"id": 1}), 1);
        assert!(Expectation::created().field_eq_opt("body", None).verify(&resp).is_ok());
    }
}
