//! AWS-oriented adapters and handlers for the inquiry intake pipeline.
//!
//! Handlers depend only on the capability traits in [`adapters`]; the Lambda
//! binaries under `src/bin` bind those traits to DynamoDB, SQS and Step
//! Functions clients.

pub mod adapters;
pub mod handlers;
