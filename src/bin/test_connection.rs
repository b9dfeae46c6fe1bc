use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command};
use kafka_topic_manager::config::ConnectionConfig;
use kafka_topic_manager::diagnostics::help::docker_help;
use kafka_topic_manager::diagnostics::{ConnectionDiagnostic, DiagnosticProfile};
use kafka_topic_manager::{KafkaAdmin, logging};
use std::error::Error;
use std::process;

fn build_cli() -> Command<'static> {
    Command::new("test-connection")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Diagnose the connection to a Kafka broker")
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .value_name("HOST:PORT")
                .help("Kafka server address (default: localhost:9092)")
                .takes_value(true),
        )
        .arg(
            Arg::new("help-docker")
                .long("help-docker")
                .help("Show how to start Kafka with Docker")
                .action(clap::ArgAction::SetTrue),
        )
}

fn parse_args() -> ArgMatches {
    match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let matches = parse_args();

    if matches.get_flag("help-docker") {
        print!("{}", docker_help());
        return Ok(());
    }

    let mut config = ConnectionConfig::default();
    config.apply_env_overrides();
    if let Some(server) = matches.get_one::<String>("server") {
        config.bootstrap_servers = server.clone();
    }

    let diagnostic = ConnectionDiagnostic::new(DiagnosticProfile::Plain, config);
    let mut stdout = std::io::stdout();

    match diagnostic
        .run(|cfg| async move { KafkaAdmin::connect(&cfg).await }, &mut stdout)
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => {
            print!("{}", docker_help());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_flags() {
        let matches = build_cli()
            .try_get_matches_from(["test-connection", "--server", "broker:9093", "--help-docker"])
            .unwrap();
        assert!(matches.get_flag("help-docker"));
        assert_eq!(
            matches.get_one::<String>("server").map(String::as_str),
            Some("broker:9093")
        );
    }
}
