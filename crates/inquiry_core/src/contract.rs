use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::payload::field_text;

pub const EXECUTION_NAME_PREFIX: &str = "inquiry-processing-";
pub const INTAKE_SUCCESS_MESSAGE: &str = "Inquiry saved successfully and processing started!";
pub const DISPATCH_SUCCESS_MESSAGE: &str = "SQS messages processed successfully";

/// Caller-supplied inquiry fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquirySubmission {
    pub mail_address: String,
    pub user_name: String,
    pub review_text: String,
}

/// The single persisted entity. Written once by the intake handler and never
/// mutated afterwards, so `created_at` and `updated_at` stay equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecord {
    pub id: String,
    pub mail_address: String,
    pub user_name: String,
    pub review_text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl InquiryRecord {
    pub fn new(submission: InquirySubmission, id: String, timestamp: String) -> Self {
        Self {
            id,
            mail_address: submission.mail_address,
            user_name: submission.user_name,
            review_text: submission.review_text,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchMessage {
    pub id: String,
}

/// Carries the message's `id` value as delivered, without coercing its type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionInput {
    pub id: Value,
}

/// A fully named workflow start, ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub name: String,
    pub input: ExecutionInput,
}

impl ExecutionRequest {
    pub fn for_inquiry(id: impl Into<Value>) -> Self {
        let id = id.into();
        Self {
            name: execution_name(&field_text(&id)),
            input: ExecutionInput { id },
        }
    }
}

/// Deterministic per inquiry, so a redelivered message collides with the
/// execution already started for it.
pub fn execution_name(id: &str) -> String {
    format!("{EXECUTION_NAME_PREFIX}{id}")
}

pub fn new_inquiry_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn creation_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
