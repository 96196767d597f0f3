pub mod queue;
pub mod record_store;
pub mod workflow;
