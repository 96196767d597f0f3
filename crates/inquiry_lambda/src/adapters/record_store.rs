use inquiry_core::contract::InquiryRecord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Unconditional single-record write into the durable store.
pub trait RecordStore {
    fn put_record(&self, table_name: &str, record: &InquiryRecord) -> Result<(), StoreError>;
}
