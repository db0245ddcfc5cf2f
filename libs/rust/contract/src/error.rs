//! Contract violation types using thiserror 2.0.

use posts_common::ClientError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Body shapes a contract can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// JSON array
    Array,
    /// JSON object
    Object,
}

impl BodyShape {
    /// Shape of a JSON value, if it is one of the tracked shapes.
    #[must_use]
    pub const fn of(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Array(_) => Some(Self::Array),
            serde_json::Value::Object(_) => Some(Self::Object),
            _ => None,
        }
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => f.write_str("array"),
            Self::Object => f.write_str("object"),
        }
    }
}

/// One broken clause of a response contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Status code differs
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus {
        /// Expected status
        expected: u16,
        /// Observed status
        actual: u16,
    },

    /// Body is not valid JSON
    #[error("response body is not valid JSON: {excerpt:?}")]
    NotJson {
        /// Leading part of the raw body
        excerpt: String,
    },

    /// Body has the wrong JSON shape
    #[error("expected {expected} body, got {actual}")]
    WrongShape {
        /// Required shape
        expected: BodyShape,
        /// Observed JSON type name
        actual: String,
    },

    /// Required field is absent
    #[error("field '{field}' is missing")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Field holds a different value
    #[error("field '{field}' expected {expected}, got {actual}")]
    FieldMismatch {
        /// Field name
        field: String,
        /// Expected value (JSON text)
        expected: String,
        /// Observed value (JSON text)
        actual: String,
    },

    /// Field is present but falsy
    #[error("field '{field}' is falsy: {actual}")]
    FalsyField {
        /// Field name
        field: String,
        /// Observed value (JSON text)
        actual: String,
    },

    /// Round trip took too long
    #[error("latency {elapsed:?} exceeds budget {budget:?}")]
    LatencyExceeded {
        /// Observed round trip
        elapsed: Duration,
        /// Allowed round trip
        budget: Duration,
    },
}

/// Failure of a single contract case.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The request could not be exchanged at all
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The response arrived but broke its contract
    #[error("{method} {path}: {}", join_violations(.violations))]
    Violations {
        /// Request method
        method: String,
        /// Request path
        path: String,
        /// Every broken clause
        violations: Vec<Violation>,
    },
}

/// Result type for contract cases.
pub type ContractResult<T> = Result<T, ContractError>;

impl ContractError {
    /// Violations carried by this error, empty for transport failures.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violations { violations, .. } => violations,
            Self::Client(_) => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
