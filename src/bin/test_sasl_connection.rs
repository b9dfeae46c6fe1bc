use clap::error::ErrorKind;
use clap::{Arg, ArgMatches, Command};
use kafka_topic_manager::config::{ConnectionConfig, SaslMechanism, SecurityProtocol};
use kafka_topic_manager::diagnostics::help::{sasl_failure_suggestions, sasl_usage_examples};
use kafka_topic_manager::diagnostics::{ConnectionDiagnostic, DiagnosticProfile};
use kafka_topic_manager::{KafkaAdmin, logging};
use std::error::Error;
use std::process;

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin-secret";

fn build_cli() -> Command<'static> {
    Command::new("test-sasl-connection")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Diagnose a SASL authenticated connection to a Kafka broker")
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .value_name("HOST:PORT")
                .help("Kafka server address (default: localhost:9092)")
                .takes_value(true),
        )
        .arg(
            Arg::new("security-protocol")
                .long("security-protocol")
                .value_name("PROTOCOL")
                .help("Security protocol")
                .takes_value(true)
                .value_parser(SecurityProtocol::VARIANTS)
                .default_value("SASL_PLAINTEXT"),
        )
        .arg(
            Arg::new("sasl-mechanism")
                .long("sasl-mechanism")
                .value_name("MECHANISM")
                .help("SASL mechanism")
                .takes_value(true)
                .value_parser(SaslMechanism::VARIANTS)
                .default_value("PLAIN"),
        )
        .arg(
            Arg::new("sasl-username")
                .long("sasl-username")
                .value_name("USERNAME")
                .help("SASL username (default: admin)")
                .takes_value(true),
        )
        .arg(
            Arg::new("sasl-password")
                .long("sasl-password")
                .value_name("PASSWORD")
                .help("SASL password (default: admin-secret)")
                .takes_value(true),
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

/// Flags win over `KTM_*` variables, which win over the built-in
/// `admin` / `admin-secret` credentials.
fn sasl_config(matches: &ArgMatches) -> Result<ConnectionConfig, Box<dyn Error>> {
    let mut config = ConnectionConfig::default();
    config.apply_env_overrides();

    if let Some(server) = matches.get_one::<String>("server") {
        config.bootstrap_servers = server.clone();
    }
    if let Some(protocol) = matches.get_one::<String>("security-protocol") {
        config.security_protocol = protocol.parse()?;
    }
    if let Some(mechanism) = matches.get_one::<String>("sasl-mechanism") {
        config.sasl.mechanism = Some(mechanism.parse()?);
    }

    config.sasl.username = matches
        .get_one::<String>("sasl-username")
        .cloned()
        .or(config.sasl.username)
        .or_else(|| Some(DEFAULT_USERNAME.to_string()));
    config.sasl.password = matches
        .get_one::<String>("sasl-password")
        .cloned()
        .or(config.sasl.password)
        .or_else(|| Some(DEFAULT_PASSWORD.to_string()));

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let matches = parse_args();

    let config = match sasl_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let diagnostic = ConnectionDiagnostic::new(DiagnosticProfile::Sasl, config);
    let mut stdout = std::io::stdout();

    match diagnostic
        .run(|cfg| async move { KafkaAdmin::connect(&cfg).await }, &mut stdout)
        .await
    {
        Ok(true) => {
            print!("{}", sasl_usage_examples());
            Ok(())
        }
        Ok(false) => {
            print!("{}", sasl_failure_suggestions());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
