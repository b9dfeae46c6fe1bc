//! Topic management facade.
//!
//! [`TopicManager`] makes one call into a [`TopicAdmin`] per operation and
//! writes a human-readable (or JSON) report. Broker-side failures are
//! reported, not propagated: an operation returns `false`, an empty list or
//! `None`. Only failures to write the report surface as errors.

use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, error};

use crate::admin::{AdminError, NewTopicSpec, TopicAdmin, TopicDescription};

/// Width of the `=` rules framing listings.
pub const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub struct TopicManager<A, W> {
    admin: A,
    out: W,
    format: OutputFormat,
}

#[derive(Serialize)]
struct TopicListing<'a> {
    total: usize,
    topics: &'a [String],
}

impl<A: TopicAdmin, W: Write> TopicManager<A, W> {
    pub fn new(admin: A, out: W) -> Self {
        Self {
            admin,
            out,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// Create a topic. Returns whether it was created.
    pub async fn create_topic(&mut self, spec: &NewTopicSpec) -> io::Result<bool> {
        match self.admin.create_topic(spec).await {
            Ok(()) => {
                debug!(topic = %spec.name, "topic created");
                writeln!(self.out, "✓ Topic '{}' created successfully", spec.name)?;
                writeln!(self.out, "  - Partitions: {}", spec.num_partitions)?;
                writeln!(self.out, "  - Replication Factor: {}", spec.replication_factor)?;
                Ok(true)
            }
            Err(AdminError::TopicAlreadyExists(_)) => {
                writeln!(self.out, "✗ Topic '{}' already exists", spec.name)?;
                Ok(false)
            }
            Err(e) => {
                error!(topic = %spec.name, error = %e, "failed to create topic");
                writeln!(self.out, "✗ Failed to create topic '{}': {}", spec.name, e)?;
                Ok(false)
            }
        }
    }

    /// List topic names, sorted. Returns an empty list on failure.
    pub async fn list_topics(&mut self) -> io::Result<Vec<String>> {
        let mut topics = match self.admin.list_topics().await {
            Ok(topics) => topics,
            Err(e) => {
                error!(error = %e, "failed to list topics");
                writeln!(self.out, "✗ Failed to list topics: {}", e)?;
                return Ok(Vec::new());
            }
        };
        topics.sort();

        match self.format {
            OutputFormat::Json => {
                let listing = TopicListing {
                    total: topics.len(),
                    topics: &topics,
                };
                self.write_json(&listing)?;
            }
            OutputFormat::Text => {
                writeln!(self.out, "\n{}", rule())?;
                writeln!(self.out, "Available Kafka Topics ({} total):", topics.len())?;
                writeln!(self.out, "{}", rule())?;

                if topics.is_empty() {
                    writeln!(self.out, "No topics found")?;
                } else {
                    for (idx, topic) in topics.iter().enumerate() {
                        writeln!(self.out, "{:3}. {}", idx + 1, topic)?;
                    }
                }

                writeln!(self.out, "{}\n", rule())?;
            }
        }

        Ok(topics)
    }

    /// Delete a topic. Returns whether it was deleted.
    pub async fn delete_topic(&mut self, name: &str) -> io::Result<bool> {
        match self.admin.delete_topic(name).await {
            Ok(()) => {
                debug!(topic = %name, "topic deleted");
                writeln!(self.out, "✓ Topic '{}' deleted successfully", name)?;
                Ok(true)
            }
            Err(AdminError::UnknownTopic(_)) => {
                writeln!(self.out, "✗ Topic '{}' does not exist", name)?;
                Ok(false)
            }
            Err(e) => {
                error!(topic = %name, error = %e, "failed to delete topic");
                writeln!(self.out, "✗ Failed to delete topic '{}': {}", name, e)?;
                Ok(false)
            }
        }
    }

    /// Describe the partitions of a topic.
    pub async fn get_topic_metadata(&mut self, name: &str) -> io::Result<Option<TopicDescription>> {
        let description = match self.admin.describe_topic(name).await {
            Ok(description) => description,
            Err(e) => {
                error!(topic = %name, error = %e, "failed to describe topic");
                writeln!(self.out, "✗ Failed to get metadata for topic '{}': {}", name, e)?;
                return Ok(None);
            }
        };

        match self.format {
            OutputFormat::Json => self.write_json(&description)?,
            OutputFormat::Text => {
                writeln!(self.out, "\nTopic Metadata for '{}':", name)?;
                writeln!(self.out, "{}", rule())?;
                write!(self.out, "{}", render_description(&description))?;
                writeln!(self.out, "{}\n", rule())?;
            }
        }

        Ok(Some(description))
    }

    /// Release the admin client. JSON output gets no closing line, so the
    /// writer only ever holds JSON documents.
    pub fn close(mut self) -> io::Result<W> {
        drop(self.admin);
        if self.format == OutputFormat::Text {
            writeln!(self.out, "✓ Kafka connection closed")?;
        }
        Ok(self.out)
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)
    }
}

/// Text block for one topic: name, partition count, one line per partition.
pub fn render_description(description: &TopicDescription) -> String {
    let mut rendered = format!(
        "Topic: {}\nPartitions: {}\n",
        description.topic,
        description.partitions.len()
    );
    for partition in &description.partitions {
        rendered.push_str(&format!(
            "  Partition {}: Leader={}, Replicas={:?}, ISR={:?}\n",
            partition.partition, partition.leader, partition.replicas, partition.isr
        ));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::PartitionDescription;

    #[test]
    fn test_render_description() {
        let description = TopicDescription {
            topic: "orders".to_string(),
            partitions: vec![
                PartitionDescription {
                    partition: 0,
                    leader: 1,
                    replicas: vec![1, 2],
                    isr: vec![1, 2],
                },
                PartitionDescription {
                    partition: 1,
                    leader: 2,
                    replicas: vec![2, 3],
                    isr: vec![2],
                },
            ],
        };

        assert_eq!(
            render_description(&description),
            "Topic: orders\n\
             Partitions: 2\n  \
             Partition 0: Leader=1, Replicas=[1, 2], ISR=[1, 2]\n  \
             Partition 1: Leader=2, Replicas=[2, 3], ISR=[2]\n"
        );
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_rule_width() {
        assert_eq!(rule().len(), RULE_WIDTH);
    }
}
