use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command, value_parser};
use kafka_topic_manager::config::{SaslMechanism, SecurityProtocol};
use kafka_topic_manager::manager::rule;
use kafka_topic_manager::{OutputFormat, TopicManager, logging};
use std::error::Error;
use std::io::{self, Write};

mod commands;
mod error;

use commands::*;
use error::{CliError, CliResult};

const EXAMPLES: &str = "Examples:
  # List all topics
  kafka-topic-manager list

  # Create a new topic
  kafka-topic-manager create --topic my-topic --partitions 3 --replication-factor 2

  # Delete a topic
  kafka-topic-manager delete --topic my-topic

  # Get topic metadata
  kafka-topic-manager metadata --topic my-topic

  # Use custom Kafka server
  kafka-topic-manager list --server kafka-broker:9092";

fn topic_arg(help: &'static str) -> Arg<'static> {
    Arg::new("topic")
        .short('t')
        .long("topic")
        .value_name("TOPIC")
        .help(help)
        .takes_value(true)
        .required(true)
}

fn build_cli() -> Command<'static> {
    Command::new("kafka-topic-manager")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Kafka Topic Manager - Create, List, and Delete Topics")
        .after_help(EXAMPLES)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .value_name("HOST:PORT")
                .help("Kafka bootstrap server address (default: localhost:9092)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("security-protocol")
                .long("security-protocol")
                .value_name("PROTOCOL")
                .help("Security protocol (default: PLAINTEXT)")
                .takes_value(true)
                .value_parser(SecurityProtocol::VARIANTS)
                .global(true),
        )
        .arg(
            Arg::new("sasl-mechanism")
                .long("sasl-mechanism")
                .value_name("MECHANISM")
                .help("SASL mechanism (e.g., PLAIN, SCRAM-SHA-256)")
                .takes_value(true)
                .value_parser(SaslMechanism::VARIANTS)
                .global(true),
        )
        .arg(
            Arg::new("sasl-username")
                .long("sasl-username")
                .value_name("USERNAME")
                .help("SASL username for authentication")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("sasl-password")
                .long("sasl-password")
                .value_name("PASSWORD")
                .help("SASL password for authentication")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .value_name("MS")
                .help("Request timeout in milliseconds (default: 30000)")
                .takes_value(true)
                .value_parser(value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .help("Output format for list and metadata (default: text)")
                .takes_value(true)
                .value_parser(["text", "json"])
                .global(true),
        )
        .subcommand(
            Command::new("create")
                .about("Create a new topic")
                .arg(topic_arg("Name of the topic to create"))
                .arg(
                    Arg::new("partitions")
                        .short('p')
                        .long("partitions")
                        .value_name("PARTITIONS")
                        .help("Number of partitions for topic creation")
                        .takes_value(true)
                        .value_parser(value_parser!(i32).range(1..))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("replication-factor")
                        .short('r')
                        .long("replication-factor")
                        .value_name("FACTOR")
                        .help("Replication factor for topic creation")
                        .takes_value(true)
                        .value_parser(value_parser!(i32).range(1..))
                        .default_value("1"),
                ),
        )
        .subcommand(Command::new("list").about("List all topics"))
        .subcommand(
            Command::new("delete")
                .about("Delete a topic")
                .arg(topic_arg("Name of the topic to delete")),
        )
        .subcommand(
            Command::new("metadata")
                .about("Show the partition layout of a topic")
                .arg(topic_arg("Name of the topic to describe")),
        )
}

/// Parse arguments. Help and version exit 0, every other parse failure
/// exits 1.
fn parse_args() -> ArgMatches {
    match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

async fn run(matches: &ArgMatches) -> CliResult<()> {
    let (operation, sub_matches) = matches.subcommand().ok_or(CliError::NoCommand)?;

    let config = connection_config(sub_matches)?;
    let format = output_format(sub_matches)?;

    // JSON keeps stdout for the documents; everything else goes to stderr.
    let mut status: Box<dyn Write> = match format {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };

    writeln!(status, "\n{}", rule())?;
    writeln!(status, "Kafka Topic Manager")?;
    writeln!(status, "{}\n", rule())?;

    let admin = connect(&config, &mut status).await?;
    let mut manager = TopicManager::new(admin, io::stdout()).with_format(format);

    let result = match operation {
        "create" => handle_topic_create_command(&mut manager, sub_matches).await,
        "list" => handle_topic_list_command(&mut manager, sub_matches).await,
        "delete" => handle_topic_delete_command(&mut manager, sub_matches).await,
        "metadata" => handle_topic_describe_command(&mut manager, sub_matches).await,
        cmd => Err(CliError::UnknownCommand(cmd.to_string())),
    };

    manager.close()?;
    if format == OutputFormat::Json {
        writeln!(status, "✓ Kafka connection closed")?;
    }
    writeln!(status)?;

    result
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let matches = parse_args();

    if let Err(err) = run(&matches).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
