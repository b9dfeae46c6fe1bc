//! # kafka-topic-manager
//!
//! Create, list, delete and inspect Kafka topics from the command line, and
//! diagnose why a broker cannot be reached.
//!
//! Everything that talks to the cluster is delegated to librdkafka through
//! [`rdkafka`]; this crate builds the client from command-line input, makes
//! one admin call per command and prints the result.
//!
//! ## CLI Features
//!
//! ### kafka-topic-manager
//!
//! ```bash
//! kafka-topic-manager <create|list|delete|metadata> [OPTIONS]
//! ```
//!
//! **Options:**
//!
//! - `--server` (default `localhost:9092`): bootstrap server address.
//! - `--topic`: topic name, required for `create`, `delete` and `metadata`.
//! - `--partitions` (default 1): partition count for `create`.
//! - `--replication-factor` (default 1): replication factor for `create`.
//! - `--security-protocol` (default `PLAINTEXT`): `PLAINTEXT`,
//!   `SASL_PLAINTEXT`, `SASL_SSL` or `SSL`.
//! - `--sasl-mechanism`: `PLAIN`, `SCRAM-SHA-256`, `SCRAM-SHA-512` or `GSSAPI`.
//! - `--sasl-username`, `--sasl-password`: credentials for PLAIN and SCRAM.
//! - `--timeout-ms` (default 30000): request timeout.
//! - `--output` (default `text`): `text` or `json` for `list` and `metadata`.
//!
//! **Example:**
//!
//! ```bash
//! kafka-topic-manager create --topic my-topic --partitions 3 --replication-factor 2
//! kafka-topic-manager list --server kafka-broker:9092
//! ```
//!
//! ------------------------------------------------------------------------------------------------
//!
//! ### test-connection
//!
//! Checks TCP reachability of the broker, then connects with the admin client
//! and lists topics. Prints Docker instructions when the check fails, or on
//! demand with `--help-docker`.
//!
//! ### test-sasl-connection
//!
//! Same checks with SASL authentication (`admin` / `admin-secret` over
//! `SASL_PLAINTEXT` + `PLAIN` by default).
//!
//! ------------------------------------------------------------------------------------------------
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use kafka_topic_manager::admin::{KafkaAdmin, NewTopicSpec};
//! use kafka_topic_manager::config::ConnectionConfig;
//! use kafka_topic_manager::manager::TopicManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new("localhost:9092");
//!     let admin = KafkaAdmin::connect(&config).await?;
//!
//!     let mut manager = TopicManager::new(admin, std::io::stdout());
//!     manager.create_topic(&NewTopicSpec::new("orders", 3, 1)).await?;
//!     manager.list_topics().await?;
//!     manager.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! - `KTM_BOOTSTRAP_SERVERS`, `KTM_TIMEOUT_MS`, `KTM_SASL_USERNAME`,
//!   `KTM_SASL_PASSWORD`: defaults for the matching flags.
//! - `KTM_LOG_LEVEL` (default `warn`): level of the stderr logger.
//!
//! ### License
//!
//! MIT

pub mod admin;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod manager;

pub use admin::{AdminError, KafkaAdmin, NewTopicSpec, TopicAdmin, TopicDescription};
pub use config::{ConnectionConfig, SaslConfig, SaslMechanism, SecurityProtocol};
pub use manager::{OutputFormat, TopicManager};

pub mod prelude {
    pub use crate::admin::{AdminError, KafkaAdmin, NewTopicSpec, TopicAdmin};
    pub use crate::config::ConnectionConfig;
    pub use crate::manager::TopicManager;
}
