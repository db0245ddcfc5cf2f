//! Contract verification suite for the posts REST API.
//!
//! Issues one request per case against a running server and checks status,
//! JSON shape, field values and latency of the response.
//!
//! ```no_run
//! use posts_common::ApiConfig;
//! use posts_contract::ContractSuite;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let suite = ContractSuite::new(ApiConfig::from_env()?)?;
//! let report = suite.run_all().await;
//! assert!(report.ok, "{}", report.summary);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cases;
pub mod client;
pub mod error;
pub mod expectation;
pub mod fixture;
pub mod model;
pub mod report;
pub mod response;
pub mod suite;

pub use cases::{ContractCase, Operation};
pub use client::PostsClient;
pub use error::{BodyShape, ContractError, ContractResult, Violation};
pub use expectation::{Expectation, FieldCheck};
pub use fixture::PostFixture;
pub use model::{NewPost, Post, PostId, PostUpdate};
pub use report::{CaseOutcome, SuiteReport};
pub use response::TimedResponse;
pub use suite::ContractSuite;
