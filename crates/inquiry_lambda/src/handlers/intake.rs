use chrono::{DateTime, Utc};
use inquiry_core::config::IntakeConfig;
use inquiry_core::contract::{
    creation_timestamp, new_inquiry_id, DispatchMessage, InquiryRecord, INTAKE_SUCCESS_MESSAGE,
};
use inquiry_core::payload::{extract_payload, validate_submission};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::queue::MessagePublisher;
use crate::adapters::record_store::RecordStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

pub fn handle_intake_event(
    event: Value,
    config: &IntakeConfig,
    store: &dyn RecordStore,
    publisher: &dyn MessagePublisher,
) -> ApiGatewayResponse {
    handle_intake_event_at(event, config, store, publisher, Utc::now())
}

pub fn handle_intake_event_at(
    event: Value,
    config: &IntakeConfig,
    store: &dyn RecordStore,
    publisher: &dyn MessagePublisher,
    now: DateTime<Utc>,
) -> ApiGatewayResponse {
    let payload = match extract_payload(event) {
        Ok(value) => value,
        Err(error) => {
            tracing::info!(component = "intake_handler", %error, "rejected malformed body");
            return json_response(400, json!({ "error": error.to_string() }));
        }
    };

    let submission = match validate_submission(&payload) {
        Ok(value) => value,
        Err(missing) => {
            tracing::info!(
                component = "intake_handler",
                missing_fields = ?missing.fields,
                "rejected incomplete inquiry"
            );
            return json_response(
                400,
                json!({
                    "error": "Validation failed",
                    "missing_fields": missing.fields,
                }),
            );
        }
    };

    let record = InquiryRecord::new(submission, new_inquiry_id(), creation_timestamp(now));

    if let Err(message) = persist_and_notify(&record, config, store, publisher) {
        tracing::error!(
            component = "intake_handler",
            inquiry_id = %record.id,
            error = %message,
            "failed to persist or enqueue inquiry"
        );
        return json_response(
            500,
            Value::String(format!(
                "Error saving item to DynamoDB or sending SQS message: {message}"
            )),
        );
    }

    json_response(
        200,
        json!({
            "message": INTAKE_SUCCESS_MESSAGE,
            "id": record.id,
        }),
    )
}

/// No rollback: a publish failure leaves the written record in place.
fn persist_and_notify(
    record: &InquiryRecord,
    config: &IntakeConfig,
    store: &dyn RecordStore,
    publisher: &dyn MessagePublisher,
) -> Result<(), String> {
    store
        .put_record(&config.table_name, record)
        .map_err(|error| error.to_string())?;
    tracing::info!(
        component = "intake_handler",
        inquiry_id = %record.id,
        table_name = %config.table_name,
        "inquiry record written"
    );

    let Some(queue_url) = config.queue_url.as_deref() else {
        tracing::warn!(
            component = "intake_handler",
            inquiry_id = %record.id,
            "SQS_QUEUE_URL is not configured; dispatch message dropped"
        );
        return Ok(());
    };

    let message = DispatchMessage {
        id: record.id.clone(),
    };
    let receipt = publisher
        .publish(queue_url, &message)
        .map_err(|error| error.to_string())?;
    tracing::info!(
        component = "intake_handler",
        inquiry_id = %record.id,
        message_id = receipt.message_id.as_deref().unwrap_or("unknown"),
        "dispatch message sent"
    );
    Ok(())
}

fn json_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::adapters::queue::{PublishError, PublishReceipt};
    use crate::adapters::record_store::StoreError;

    struct RecordingStore {
        writes: Mutex<Vec<(String, InquiryRecord)>>,
        fail_with: Option<&'static str>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                fail_with: Some(message),
            }
        }

        fn writes(&self) -> Vec<(String, InquiryRecord)> {
            self.writes.lock().expect("poisoned mutex").clone()
        }
    }

    impl RecordStore for RecordingStore {
        fn put_record(&self, table_name: &str, record: &InquiryRecord) -> Result<(), StoreError> {
            if let Some(message) = self.fail_with {
                return Err(StoreError(message.to_string()));
            }
            self.writes
                .lock()
                .expect("poisoned mutex")
                .push((table_name.to_string(), record.clone()));
            Ok(())
        }
    }

    struct CapturingPublisher {
        messages: Mutex<Vec<(String, DispatchMessage)>>,
        fail_with: Option<&'static str>,
    }

    impl CapturingPublisher {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
                fail_with: Some(message),
            }
        }

        fn messages(&self) -> Vec<(String, DispatchMessage)> {
            self.messages.lock().expect("poisoned mutex").clone()
        }
    }

    impl MessagePublisher for CapturingPublisher {
        fn publish(
            &self,
            queue_url: &str,
            message: &DispatchMessage,
        ) -> Result<PublishReceipt, PublishError> {
            if let Some(error) = self.fail_with {
                return Err(PublishError(error.to_string()));
            }
            self.messages
                .lock()
                .expect("poisoned mutex")
                .push((queue_url.to_string(), message.clone()));
            Ok(PublishReceipt {
                message_id: Some("msg-1".to_string()),
            })
        }
    }

    fn sample_config() -> IntakeConfig {
        IntakeConfig {
            table_name: "InquiryTable".to_string(),
            queue_url: Some("https://sqs.example/inquiries".to_string()),
        }
    }

    fn valid_body() -> Value {
        json!({
            "mailAddress": "taro@example.com",
            "userName": "Taro",
            "reviewText": "Breakfast was cold",
        })
    }

    fn body_json(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("response body should be JSON")
    }

    #[test]
    fn persists_record_and_enqueues_its_id() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();
        let now = Utc
            .with_ymd_and_hms(2025, 9, 1, 23, 11, 11)
            .single()
            .expect("valid date");

        let response = handle_intake_event_at(
            json!({ "body": valid_body().to_string() }),
            &sample_config(),
            &store,
            &publisher,
            now,
        );

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert_eq!(body["message"], INTAKE_SUCCESS_MESSAGE);
        let id = body["id"].as_str().expect("id should be a string");

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        let (table, record) = &writes[0];
        assert_eq!(table, "InquiryTable");
        assert_eq!(record.id, id);
        assert_eq!(record.user_name, "Taro");
        assert_eq!(record.created_at, "2025-09-01T23:11:11.000000Z");
        assert_eq!(record.created_at, record.updated_at);

        assert_eq!(
            publisher.messages(),
            vec![(
                "https://sqs.example/inquiries".to_string(),
                DispatchMessage { id: id.to_string() }
            )]
        );
    }

    #[test]
    fn accepts_direct_invocation_payload() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();

        let response = handle_intake_event(valid_body(), &sample_config(), &store, &publisher);

        assert_eq!(response.status_code, 200);
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn generates_distinct_ids_per_invocation() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();

        let ids: HashSet<String> = (0..20)
            .map(|_| {
                let response =
                    handle_intake_event(valid_body(), &sample_config(), &store, &publisher);
                body_json(&response)["id"]
                    .as_str()
                    .expect("id should be a string")
                    .to_string()
            })
            .collect();

        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn rejects_missing_fields_without_side_effects() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();

        let response = handle_intake_event(
            json!({ "body": "{\"mailAddress\":\"a@example.com\",\"userName\":\"\"}" }),
            &sample_config(),
            &store,
            &publisher,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(
            body_json(&response),
            json!({
                "error": "Validation failed",
                "missing_fields": ["userName", "reviewText"],
            })
        );
        assert!(store.writes().is_empty());
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn rejects_malformed_json_without_side_effects() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();

        let response = handle_intake_event(
            json!({ "body": "{\"mailAddress\": " }),
            &sample_config(),
            &store,
            &publisher,
        );

        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response), json!({"error": "Invalid JSON format"}));
        assert!(store.writes().is_empty());
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn null_body_falls_back_to_event_and_fails_validation() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();

        let response =
            handle_intake_event(json!({ "body": null }), &sample_config(), &store, &publisher);

        assert_eq!(response.status_code, 400);
        assert_eq!(
            body_json(&response),
            json!({
                "error": "Validation failed",
                "missing_fields": ["mailAddress", "userName", "reviewText"],
            })
        );
        assert!(store.writes().is_empty());
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn missing_queue_url_still_succeeds() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::new();
        let config = IntakeConfig {
            queue_url: None,
            ..sample_config()
        };

        let response = handle_intake_event(valid_body(), &config, &store, &publisher);

        assert_eq!(response.status_code, 200);
        assert_eq!(store.writes().len(), 1);
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn store_failure_returns_500_without_publishing() {
        let store = RecordingStore::failing("ProvisionedThroughputExceeded");
        let publisher = CapturingPublisher::new();

        let response = handle_intake_event(valid_body(), &sample_config(), &store, &publisher);

        assert_eq!(response.status_code, 500);
        assert!(body_json(&response)
            .as_str()
            .expect("500 body should be a JSON string")
            .contains("ProvisionedThroughputExceeded"));
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn publish_failure_returns_500_and_keeps_record() {
        let store = RecordingStore::new();
        let publisher = CapturingPublisher::failing("queue does not exist");

        let response = handle_intake_event(valid_body(), &sample_config(), &store, &publisher);

        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            json!("Error saving item to DynamoDB or sending SQS message: queue does not exist")
        );
        assert_eq!(store.writes().len(), 1);
    }
}
