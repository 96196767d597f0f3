use inquiry_core::contract::DispatchMessage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PublishError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

pub trait MessagePublisher {
    fn publish(
        &self,
        queue_url: &str,
        message: &DispatchMessage,
    ) -> Result<PublishReceipt, PublishError>;
}
