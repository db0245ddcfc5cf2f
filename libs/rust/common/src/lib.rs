//! Shared client plumbing for the posts API contract suite.
//!
//! This crate provides centralized implementations for:
//! - The client-side error type
//! - HTTP client building
//! - Environment-driven API settings
//! - Tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod tracing_config;

pub use config::ApiConfig;
pub use error::{ClientError, ClientResult};
pub use http::{USER_AGENT, build_http_client};
pub use tracing_config::{TracingConfig, try_init_tracing};
