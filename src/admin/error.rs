use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by topic administration.
#[derive(Error, Debug, Clone)]
pub enum AdminError {
    #[error("Topic '{0}' already exists")]
    TopicAlreadyExists(String),

    #[error("Topic '{0}' does not exist")]
    UnknownTopic(String),

    #[error("{topic}: {code}")]
    Rejected {
        topic: String,
        code: RDKafkaErrorCode,
    },

    #[error("Failed to create admin client: {0}")]
    ClientCreation(String),

    #[error("{0}")]
    Kafka(KafkaError),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl From<KafkaError> for AdminError {
    fn from(error: KafkaError) -> Self {
        match error {
            KafkaError::ClientCreation(message) => AdminError::ClientCreation(message),
            other => AdminError::Kafka(other),
        }
    }
}

impl From<tokio::task::JoinError> for AdminError {
    fn from(error: tokio::task::JoinError) -> Self {
        AdminError::Task(error.to_string())
    }
}

impl AdminError {
    /// The librdkafka error code behind this error, if there is one.
    pub fn code(&self) -> Option<RDKafkaErrorCode> {
        match self {
            AdminError::TopicAlreadyExists(_) => Some(RDKafkaErrorCode::TopicAlreadyExists),
            AdminError::UnknownTopic(_) => Some(RDKafkaErrorCode::UnknownTopicOrPartition),
            AdminError::Rejected { code, .. } => Some(*code),
            AdminError::Kafka(error) => error.rdkafka_error_code(),
            AdminError::Timeout(_) => Some(RDKafkaErrorCode::OperationTimedOut),
            AdminError::ClientCreation(_) | AdminError::Config(_) | AdminError::Task(_) => None,
        }
    }

    /// Short name of the failure, e.g. `MetadataFetch(AllBrokersDown)`.
    pub fn kind_name(&self) -> String {
        match self {
            AdminError::TopicAlreadyExists(_) => "TopicAlreadyExists".to_string(),
            AdminError::UnknownTopic(_) => "UnknownTopicOrPartition".to_string(),
            AdminError::Rejected { code, .. } => format!("{:?}", code),
            AdminError::ClientCreation(_) => "ClientCreation".to_string(),
            AdminError::Kafka(error) => kafka_error_name(error),
            AdminError::Timeout(_) => "Timeout".to_string(),
            AdminError::Config(_) => "Config".to_string(),
            AdminError::Task(_) => "Task".to_string(),
        }
    }
}

fn kafka_error_name(error: &KafkaError) -> String {
    let variant = match error {
        KafkaError::AdminOp(_) => "AdminOp",
        KafkaError::AdminOpCreation(_) => "AdminOpCreation",
        KafkaError::MetadataFetch(_) => "MetadataFetch",
        KafkaError::ClientConfig(..) => "ClientConfig",
        KafkaError::ClientCreation(_) => "ClientCreation",
        KafkaError::Global(_) => "Global",
        _ => "KafkaError",
    };
    match error.rdkafka_error_code() {
        Some(code) => format!("{}({:?})", variant, code),
        None => variant.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            AdminError::TopicAlreadyExists("orders".into()).code(),
            Some(RDKafkaErrorCode::TopicAlreadyExists)
        );
        assert_eq!(
            AdminError::Kafka(KafkaError::MetadataFetch(RDKafkaErrorCode::AllBrokersDown)).code(),
            Some(RDKafkaErrorCode::AllBrokersDown)
        );
        assert_eq!(AdminError::Task("panicked".into()).code(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            AdminError::Kafka(KafkaError::MetadataFetch(RDKafkaErrorCode::AllBrokersDown)).kind_name(),
            "MetadataFetch(AllBrokersDown)"
        );
        assert_eq!(
            AdminError::Rejected {
                topic: "orders".into(),
                code: RDKafkaErrorCode::InvalidReplicationFactor,
            }
            .kind_name(),
            "InvalidReplicationFactor"
        );
        assert_eq!(AdminError::Timeout(Duration::from_secs(1)).kind_name(), "Timeout");
    }

    #[test]
    fn test_client_creation_is_split_out() {
        let error: AdminError = KafkaError::ClientCreation("bad sasl.mechanism".into()).into();
        assert!(matches!(error, AdminError::ClientCreation(ref m) if m == "bad sasl.mechanism"));
        assert_eq!(error.to_string(), "Failed to create admin client: bad sasl.mechanism");
    }
}
