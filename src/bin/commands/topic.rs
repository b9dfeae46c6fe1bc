//! Topic management commands
//!
//! Each handler pulls its arguments out of the subcommand matches and makes a
//! single call on the topic manager, which prints the outcome. A rejected
//! operation is not an error for the process.

use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use kafka_topic_manager::{NewTopicSpec, TopicAdmin, TopicManager};
use log::info;
use std::io::Write;

fn topic_name(matches: &ArgMatches) -> CliResult<&str> {
    matches
        .get_one::<String>("topic")
        .map(String::as_str)
        .ok_or_else(|| CliError::ParseError {
            field: "topic".to_string(),
            message: "Topic name is not specified".to_string(),
        })
}

/// Handle topic create command
pub async fn handle_topic_create_command<A: TopicAdmin, W: Write>(
    manager: &mut TopicManager<A, W>,
    matches: &ArgMatches,
) -> CliResult<()> {
    let name = topic_name(matches)?;
    let partitions = matches.get_one::<i32>("partitions").copied().unwrap_or(1);
    let replication = matches
        .get_one::<i32>("replication-factor")
        .copied()
        .unwrap_or(1);

    let spec = NewTopicSpec::new(name, partitions, replication);
    let created = manager.create_topic(&spec).await?;
    info!("create '{}': {}", name, if created { "done" } else { "not created" });
    Ok(())
}

/// Handle topic list command
pub async fn handle_topic_list_command<A: TopicAdmin, W: Write>(
    manager: &mut TopicManager<A, W>,
    _matches: &ArgMatches,
) -> CliResult<()> {
    let topics = manager.list_topics().await?;
    info!("listed {} topics", topics.len());
    Ok(())
}

/// Handle topic delete command
pub async fn handle_topic_delete_command<A: TopicAdmin, W: Write>(
    manager: &mut TopicManager<A, W>,
    matches: &ArgMatches,
) -> CliResult<()> {
    let name = topic_name(matches)?;
    let deleted = manager.delete_topic(name).await?;
    info!("delete '{}': {}", name, if deleted { "done" } else { "not deleted" });
    Ok(())
}

/// Handle topic metadata command
pub async fn handle_topic_describe_command<A: TopicAdmin, W: Write>(
    manager: &mut TopicManager<A, W>,
    matches: &ArgMatches,
) -> CliResult<()> {
    let name = topic_name(matches)?;
    if let Some(description) = manager.get_topic_metadata(name).await? {
        info!(
            "described '{}': {} partitions",
            name,
            description.partitions.len()
        );
    }
    Ok(())
}
