use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::metadata::Metadata;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{AdminError, AdminResult, NewTopicSpec, PartitionDescription, TopicAdmin, TopicDescription};
use crate::config::ConnectionConfig;

/// Slack on top of the client-side timeout before giving up on a request
/// that librdkafka has not resolved itself.
const TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Admin client backed by librdkafka.
pub struct KafkaAdmin {
    client: Arc<AdminClient<DefaultClientContext>>,
    timeout: Duration,
}

/// Owned copy of a metadata response; `Metadata` itself stays on the
/// blocking thread that fetched it.
struct ClusterSnapshot {
    broker_count: usize,
    topics: Vec<TopicSnapshot>,
}

struct TopicSnapshot {
    description: TopicDescription,
    error: Option<RDKafkaErrorCode>,
}

impl From<&Metadata> for ClusterSnapshot {
    fn from(metadata: &Metadata) -> Self {
        let topics = metadata
            .topics()
            .iter()
            .map(|topic| TopicSnapshot {
                description: TopicDescription {
                    topic: topic.name().to_string(),
                    partitions: topic
                        .partitions()
                        .iter()
                        .map(|partition| PartitionDescription {
                            partition: partition.id(),
                            leader: partition.leader(),
                            replicas: partition.replicas().to_vec(),
                            isr: partition.isr().to_vec(),
                        })
                        .collect(),
                },
                error: topic.error().map(RDKafkaErrorCode::from),
            })
            .collect();

        ClusterSnapshot {
            broker_count: metadata.brokers().len(),
            topics,
        }
    }
}

impl KafkaAdmin {
    /// Create the admin client and bootstrap it against the cluster.
    ///
    /// librdkafka connects lazily, so a metadata request is issued here to
    /// surface unreachable brokers and rejected credentials before any
    /// operation runs.
    pub async fn connect(config: &ConnectionConfig) -> AdminResult<Self> {
        config.validate()?;

        debug!(
            servers = %config.bootstrap_servers,
            client_id = %config.client_id,
            protocol = %config.security_protocol,
            "creating admin client"
        );

        let client: AdminClient<DefaultClientContext> = config.to_client_config().create()?;
        let admin = Self {
            client: Arc::new(client),
            timeout: config.timeout,
        };

        let snapshot = admin.fetch_metadata(None).await?;
        info!(
            servers = %config.bootstrap_servers,
            brokers = snapshot.broker_count,
            topics = snapshot.topics.len(),
            "connected to cluster"
        );

        Ok(admin)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn options(&self) -> AdminOptions {
        AdminOptions::new()
            .request_timeout(Some(self.timeout))
            .operation_timeout(Some(self.timeout))
    }

    async fn with_deadline<T, F>(&self, fut: F) -> AdminResult<T>
    where
        F: Future<Output = AdminResult<T>>,
    {
        timeout(self.timeout + TIMEOUT_GRACE, fut)
            .await
            .map_err(|_| AdminError::Timeout(self.timeout))?
    }

    async fn fetch_metadata(&self, topic: Option<&str>) -> AdminResult<ClusterSnapshot> {
        let client = Arc::clone(&self.client);
        let request_timeout = self.timeout;
        let topic = topic.map(str::to_string);

        self.with_deadline(async move {
            tokio::task::spawn_blocking(move || -> AdminResult<ClusterSnapshot> {
                let metadata = client
                    .inner()
                    .fetch_metadata(topic.as_deref(), request_timeout)?;
                Ok(ClusterSnapshot::from(&metadata))
            })
            .await
            .unwrap_or_else(|error| Err(AdminError::from(error)))
        })
        .await
    }
}

impl TopicAdmin for KafkaAdmin {
    async fn create_topic(&self, spec: &NewTopicSpec) -> AdminResult<()> {
        debug!(
            topic = %spec.name,
            partitions = spec.num_partitions,
            replication_factor = spec.replication_factor,
            "creating topic"
        );

        let new_topic = NewTopic::new(
            &spec.name,
            spec.num_partitions,
            TopicReplication::Fixed(spec.replication_factor),
        );
        let options = self.options();
        let results = self
            .with_deadline(async {
                self.client
                    .create_topics(&[new_topic], &options)
                    .await
                    .map_err(AdminError::from)
            })
            .await?;

        for result in results {
            if let Err((topic, code)) = result {
                warn!(topic = %topic, %code, "topic creation rejected");
                return Err(match code {
                    RDKafkaErrorCode::TopicAlreadyExists => AdminError::TopicAlreadyExists(topic),
                    code => AdminError::Rejected { topic, code },
                });
            }
        }

        Ok(())
    }

    async fn list_topics(&self) -> AdminResult<Vec<String>> {
        let snapshot = self.fetch_metadata(None).await?;
        Ok(snapshot
            .topics
            .into_iter()
            .map(|topic| topic.description.topic)
            .collect())
    }

    async fn delete_topic(&self, name: &str) -> AdminResult<()> {
        debug!(topic = %name, "deleting topic");

        let options = self.options();
        let results = self
            .with_deadline(async {
                self.client
                    .delete_topics(&[name], &options)
                    .await
                    .map_err(AdminError::from)
            })
            .await?;

        for result in results {
            if let Err((topic, code)) = result {
                warn!(topic = %topic, %code, "topic deletion rejected");
                return Err(match code {
                    RDKafkaErrorCode::UnknownTopicOrPartition | RDKafkaErrorCode::UnknownTopic => {
                        AdminError::UnknownTopic(topic)
                    }
                    code => AdminError::Rejected { topic, code },
                });
            }
        }

        Ok(())
    }

    async fn describe_topic(&self, name: &str) -> AdminResult<TopicDescription> {
        let snapshot = self.fetch_metadata(Some(name)).await?;

        let topic = snapshot
            .topics
            .into_iter()
            .find(|topic| topic.description.topic == name)
            .ok_or_else(|| AdminError::UnknownTopic(name.to_string()))?;

        match topic.error {
            None => Ok(topic.description),
            Some(RDKafkaErrorCode::UnknownTopicOrPartition | RDKafkaErrorCode::UnknownTopic) => {
                Err(AdminError::UnknownTopic(name.to_string()))
            }
            Some(code) => Err(AdminError::Rejected {
                topic: name.to_string(),
                code,
            }),
        }
    }
}
