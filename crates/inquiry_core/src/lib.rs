//! Shared inquiry intake domain primitives.
//!
//! This crate owns the persisted record shape, queue and workflow payload
//! contracts, request validation, and handler configuration. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
pub mod payload;
