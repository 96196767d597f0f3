use serde_json::Value;
use thiserror::Error;

use crate::contract::InquirySubmission;

pub const REQUIRED_FIELDS: [&str; 3] = ["mailAddress", "userName", "reviewText"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Invalid JSON format")]
    InvalidJson(String),
}

/// Every required field that was absent or falsy, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: missing {}", .fields.join(", "))]
pub struct MissingFields {
    pub fields: Vec<String>,
}

/// Unwraps a gateway-style `{"body": ...}` envelope. A falsy or absent body
/// means the event itself is the payload (direct invocation).
pub fn extract_payload(event: Value) -> Result<Value, PayloadError> {
    let body = match event.get("body") {
        Some(body) if is_truthy(body) => body,
        _ => return Ok(event),
    };

    match body {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| PayloadError::InvalidJson(error.to_string()))
        }
        other => Ok(other.clone()),
    }
}

pub fn validate_submission(payload: &Value) -> Result<InquirySubmission, MissingFields> {
    let mut values = Vec::with_capacity(REQUIRED_FIELDS.len());
    let mut missing = Vec::new();
    for field in REQUIRED_FIELDS {
        match payload.get(field).filter(|value| is_truthy(value)) {
            Some(value) => values.push(field_text(value)),
            None => missing.push(field.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(MissingFields { fields: missing });
    }

    let mut values = values.into_iter();
    Ok(InquirySubmission {
        mail_address: values.next().unwrap_or_default(),
        user_name: values.next().unwrap_or_default(),
        review_text: values.next().unwrap_or_default(),
    })
}

/// JSON truthiness: `null`, `false`, zero, and empty strings/arrays/objects
/// are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings are taken verbatim; anything else keeps its JSON text.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
