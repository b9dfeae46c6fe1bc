use kafka_topic_manager::admin::{AdminResult, PartitionDescription};
use kafka_topic_manager::{AdminError, NewTopicSpec, TopicAdmin, TopicDescription};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory cluster. Replica ids start at broker 1, leaders rotate.
#[derive(Default)]
pub struct MockAdmin {
    topics: Mutex<BTreeMap<String, TopicDescription>>,
    failure: Option<AdminError>,
}

#[allow(dead_code)]
impl MockAdmin {
    pub fn with_topics(names: &[&str]) -> Self {
        let admin = Self::default();
        for name in names {
            admin.insert(&NewTopicSpec::new(*name, 1, 1));
        }
        admin
    }

    /// Every call fails with `error`.
    pub fn failing(error: AdminError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.topics.lock().unwrap().contains_key(name)
    }

    fn insert(&self, spec: &NewTopicSpec) {
        let brokers: Vec<i32> = (1..=spec.replication_factor).collect();
        let partitions = (0..spec.num_partitions)
            .map(|partition| {
                let mut replicas = brokers.clone();
                replicas.rotate_left(partition as usize % brokers.len());
                PartitionDescription {
                    partition,
                    leader: replicas[0],
                    isr: replicas.clone(),
                    replicas,
                }
            })
            .collect();

        self.topics.lock().unwrap().insert(
            spec.name.clone(),
            TopicDescription {
                topic: spec.name.clone(),
                partitions,
            },
        );
    }

    fn check(&self) -> AdminResult<()> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl TopicAdmin for MockAdmin {
    async fn create_topic(&self, spec: &NewTopicSpec) -> AdminResult<()> {
        self.check()?;
        if self.contains(&spec.name) {
            return Err(AdminError::TopicAlreadyExists(spec.name.clone()));
        }
        self.insert(spec);
        Ok(())
    }

    async fn list_topics(&self) -> AdminResult<Vec<String>> {
        self.check()?;
        // Reverse order so callers have to sort.
        Ok(self.topics.lock().unwrap().keys().rev().cloned().collect())
    }

    async fn delete_topic(&self, name: &str) -> AdminResult<()> {
        self.check()?;
        match self.topics.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(AdminError::UnknownTopic(name.to_string())),
        }
    }

    async fn describe_topic(&self, name: &str) -> AdminResult<TopicDescription> {
        self.check()?;
        self.topics
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| AdminError::UnknownTopic(name.to_string()))
    }
}
