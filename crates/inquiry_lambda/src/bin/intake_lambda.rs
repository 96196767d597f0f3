use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use inquiry_core::config::IntakeConfig;
use inquiry_core::contract::{stable_contract_json, DispatchMessage, InquiryRecord};
use inquiry_lambda::adapters::queue::{MessagePublisher, PublishError, PublishReceipt};
use inquiry_lambda::adapters::record_store::{RecordStore, StoreError};
use inquiry_lambda::handlers::intake::{handle_intake_event, ApiGatewayResponse};
use lambda_runtime::{service_fn, tracing, Error, LambdaEvent};
use serde_json::Value;

struct DynamoDbRecordStore {
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl RecordStore for DynamoDbRecordStore {
    fn put_record(&self, table_name: &str, record: &InquiryRecord) -> Result<(), StoreError> {
        let client = self.dynamodb_client.clone();
        let table = table_name.to_string();
        let item = record_item(record);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        StoreError(format!(
                            "failed to put inquiry item: {}",
                            aws_sdk_dynamodb::error::DisplayErrorContext(&error)
                        ))
                    })
            })
        })
    }
}

struct SqsMessagePublisher {
    sqs_client: aws_sdk_sqs::Client,
}

impl MessagePublisher for SqsMessagePublisher {
    fn publish(
        &self,
        queue_url: &str,
        message: &DispatchMessage,
    ) -> Result<PublishReceipt, PublishError> {
        let client = self.sqs_client.clone();
        let target_queue_url = queue_url.to_string();
        let body = stable_contract_json(message);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .send_message()
                    .queue_url(target_queue_url)
                    .message_body(body)
                    .send()
                    .await
                    .map(|output| PublishReceipt {
                        message_id: output.message_id().map(str::to_string),
                    })
                    .map_err(|error| {
                        PublishError(format!(
                            "failed to enqueue dispatch message: {}",
                            aws_sdk_sqs::error::DisplayErrorContext(&error)
                        ))
                    })
            })
        })
    }
}

struct RuntimeDependencies {
    config: IntakeConfig,
    store: DynamoDbRecordStore,
    publisher: SqsMessagePublisher,
}

fn record_item(record: &InquiryRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(record.id.clone())),
        (
            "mailAddress".to_string(),
            AttributeValue::S(record.mail_address.clone()),
        ),
        (
            "userName".to_string(),
            AttributeValue::S(record.user_name.clone()),
        ),
        (
            "reviewText".to_string(),
            AttributeValue::S(record.review_text.clone()),
        ),
        (
            "createdAt".to_string(),
            AttributeValue::S(record.created_at.clone()),
        ),
        (
            "updatedAt".to_string(),
            AttributeValue::S(record.updated_at.clone()),
        ),
    ])
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_intake_event(
        event.payload,
        &deps.config,
        &deps.store,
        &deps.publisher,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = IntakeConfig::from_env();
    if config.queue_url.is_none() {
        tracing::warn!("SQS_QUEUE_URL is not configured; inquiries will not be dispatched");
    }

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        store: DynamoDbRecordStore {
            dynamodb_client: aws_sdk_dynamodb::Client::new(&aws_config),
        },
        publisher: SqsMessagePublisher {
            sqs_client: aws_sdk_sqs::Client::new(&aws_config),
        },
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
