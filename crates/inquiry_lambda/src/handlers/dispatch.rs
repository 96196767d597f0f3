use inquiry_core::config::DispatchConfig;
use inquiry_core::contract::{stable_contract_json, ExecutionRequest, DISPATCH_SUCCESS_MESSAGE};
use inquiry_core::payload::{field_text, is_truthy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::adapters::workflow::{ExecutionStarted, StartExecutionError, WorkflowStarter};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl DispatchResponse {
    pub fn processed() -> Self {
        Self {
            status_code: 200,
            body: stable_contract_json(DISPATCH_SUCCESS_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("SQS event must include a Records array")]
    MissingRecords,
}

/// Why a single queue record did not start an execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("SQS record body must be a string")]
    MissingBody,
    #[error("Error parsing SQS message body: {0}")]
    InvalidJson(String),
    #[error("Missing required parameter 'id' in message: {0}")]
    MissingId(String),
    #[error("STATE_MACHINE_ARN environment variable not set")]
    MissingStateMachineArn,
    #[error("execution {0} was already started")]
    AlreadyStarted(String),
    #[error("Error processing SQS record: {0}")]
    StartFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub received: usize,
    pub started: usize,
    pub skipped: usize,
}

/// Processes every record independently. Per-record failures are logged and
/// skipped; the batch always reports success once all records were attempted.
pub fn handle_dispatch_event(
    event: &Value,
    config: &DispatchConfig,
    engine: &dyn WorkflowStarter,
) -> Result<DispatchResponse, DispatchError> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or(DispatchError::MissingRecords)?;

    let summary = dispatch_records(records, config, engine);
    tracing::info!(
        component = "dispatch_handler",
        received = summary.received,
        started = summary.started,
        skipped = summary.skipped,
        "batch processed"
    );
    Ok(DispatchResponse::processed())
}

pub fn dispatch_records(
    records: &[Value],
    config: &DispatchConfig,
    engine: &dyn WorkflowStarter,
) -> BatchSummary {
    let mut summary = BatchSummary {
        received: records.len(),
        ..BatchSummary::default()
    };

    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        match dispatch_record(record, config, engine) {
            Ok((inquiry_id, started)) => {
                summary.started += 1;
                tracing::info!(
                    component = "dispatch_handler",
                    message_id,
                    inquiry_id = %inquiry_id,
                    execution_arn = %started.execution_arn,
                    "started workflow execution"
                );
            }
            Err(reason @ SkipReason::AlreadyStarted(_)) => {
                summary.skipped += 1;
                tracing::warn!(
                    component = "dispatch_handler",
                    message_id,
                    reason = %reason,
                    "skipped redelivered record"
                );
            }
            Err(reason) => {
                summary.skipped += 1;
                tracing::error!(
                    component = "dispatch_handler",
                    message_id,
                    reason = %reason,
                    "skipped record"
                );
            }
        }
    }

    summary
}

fn dispatch_record(
    record: &Value,
    config: &DispatchConfig,
    engine: &dyn WorkflowStarter,
) -> Result<(String, ExecutionStarted), SkipReason> {
    let body = record
        .get("body")
        .and_then(Value::as_str)
        .ok_or(SkipReason::MissingBody)?;
    let message: Value =
        serde_json::from_str(body).map_err(|error| SkipReason::InvalidJson(error.to_string()))?;
    if !message.is_object() {
        return Err(SkipReason::InvalidJson(format!(
            "expected a JSON object, got {message}"
        )));
    }

    let raw_id = message
        .get("id")
        .filter(|value| is_truthy(value))
        .cloned()
        .ok_or_else(|| SkipReason::MissingId(message.to_string()))?;
    let inquiry_id = field_text(&raw_id);

    let state_machine_arn = config
        .state_machine_arn
        .as_deref()
        .ok_or(SkipReason::MissingStateMachineArn)?;

    let request = ExecutionRequest::for_inquiry(raw_id);
    let started = engine
        .start_execution(state_machine_arn, &request)
        .map_err(|error| match error {
            StartExecutionError::AlreadyExists(name) => SkipReason::AlreadyStarted(name),
            StartExecutionError::Service(message) => SkipReason::StartFailed(message),
        })?;

    Ok((inquiry_id, started))
}
