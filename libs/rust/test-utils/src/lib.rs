//! Shared test utilities for the posts contract suite.
//!
//! This crate provides:
//! - Proptest generators for posts payloads and cases
//! - An in-memory posts API on wiremock with switchable faults
//! - Sample payloads

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{Faults, MockPostsApi};
