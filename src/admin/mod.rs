//! Topic administration.
//!
//! [`TopicAdmin`] is the seam between the command layer and the admin client:
//! each method is a single call into the client library. [`KafkaAdmin`] is the
//! librdkafka-backed implementation used by the binaries.

pub mod error;
pub mod kafka;

pub use error::{AdminError, AdminResult};
pub use kafka::KafkaAdmin;

use serde::{Deserialize, Serialize};

/// Name, partition count and replication factor of a topic to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTopicSpec {
    pub name: String,
    pub num_partitions: i32,
    pub replication_factor: i32,
}

impl NewTopicSpec {
    pub fn new(name: impl Into<String>, num_partitions: i32, replication_factor: i32) -> Self {
        Self {
            name: name.into(),
            num_partitions,
            replication_factor,
        }
    }
}

/// Partition layout of a topic as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDescription {
    pub topic: String,
    pub partitions: Vec<PartitionDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescription {
    pub partition: i32,
    /// Broker id of the leader, `-1` when there is none.
    pub leader: i32,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
}

/// Administrative operations on a cluster.
#[allow(async_fn_in_trait)]
pub trait TopicAdmin {
    async fn create_topic(&self, spec: &NewTopicSpec) -> AdminResult<()>;

    async fn list_topics(&self) -> AdminResult<Vec<String>>;

    async fn delete_topic(&self, name: &str) -> AdminResult<()>;

    async fn describe_topic(&self, name: &str) -> AdminResult<TopicDescription>;
}
