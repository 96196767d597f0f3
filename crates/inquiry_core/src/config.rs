//! Handler configuration resolved once per cold start.
//!
//! Blank values are treated the same as unset ones.

pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
pub const SQS_QUEUE_URL_ENV: &str = "SQS_QUEUE_URL";
pub const STATE_MACHINE_ARN_ENV: &str = "STATE_MACHINE_ARN";
pub const DEFAULT_TABLE_NAME: &str = "InquiryTable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub table_name: String,
    pub queue_url: Option<String>,
}

impl IntakeConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: non_blank(lookup(TABLE_NAME_ENV))
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            queue_url: non_blank(lookup(SQS_QUEUE_URL_ENV)),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    pub state_machine_arn: Option<String>,
}

impl DispatchConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            state_machine_arn: non_blank(lookup(STATE_MACHINE_ARN_ENV)),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn intake_defaults_table_name() {
        let config = IntakeConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.table_name, "InquiryTable");
        assert_eq!(config.queue_url, None);
    }

    #[test]
    fn intake_reads_configured_values() {
        let config = IntakeConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "Inquiries-prod"),
            ("SQS_QUEUE_URL", "https://sqs.example/queue"),
        ]));
        assert_eq!(config.table_name, "Inquiries-prod");
        assert_eq!(config.queue_url.as_deref(), Some("https://sqs.example/queue"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let intake = IntakeConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "  "),
            ("SQS_QUEUE_URL", ""),
        ]));
        assert_eq!(intake.table_name, "InquiryTable");
        assert_eq!(intake.queue_url, None);

        let dispatch = DispatchConfig::from_lookup(lookup_from(&[("STATE_MACHINE_ARN", "")]));
        assert_eq!(dispatch.state_machine_arn, None);
    }
}
