use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use kafka_topic_manager::config::{ConnectionConfig, SaslMechanism, SecurityProtocol};
use kafka_topic_manager::diagnostics::help::connect_failure_hints;
use kafka_topic_manager::{KafkaAdmin, OutputFormat};
use std::io::Write;
use std::time::Duration;

/// Build the connection parameters: defaults, then `KTM_*` environment
/// overrides, then flags. Fails on invalid combinations.
pub fn connection_config(matches: &ArgMatches) -> CliResult<ConnectionConfig> {
    let mut config = ConnectionConfig::default();
    config.apply_env_overrides();

    if let Some(server) = matches.get_one::<String>("server") {
        config.bootstrap_servers = server.clone();
    }

    if let Some(timeout_ms) = matches.get_one::<u64>("timeout-ms") {
        config.timeout = Duration::from_millis(*timeout_ms);
    }

    if let Some(protocol) = matches.get_one::<String>("security-protocol") {
        config.security_protocol = protocol.parse::<SecurityProtocol>()?;
    }

    if let Some(mechanism) = matches.get_one::<String>("sasl-mechanism") {
        config.sasl.mechanism = Some(mechanism.parse::<SaslMechanism>()?);
    }

    if let Some(username) = matches.get_one::<String>("sasl-username") {
        config.sasl.username = Some(username.clone());
    }

    if let Some(password) = matches.get_one::<String>("sasl-password") {
        config.sasl.password = Some(password.clone());
    }

    config.validate()?;
    Ok(config)
}

pub fn output_format(matches: &ArgMatches) -> CliResult<OutputFormat> {
    match matches.get_one::<String>("output") {
        Some(format) => format.parse().map_err(|message| CliError::ParseError {
            field: "output".to_string(),
            message,
        }),
        None => Ok(OutputFormat::Text),
    }
}

/// Connect to the cluster, writing progress to `status`. On failure the
/// troubleshooting hints are written before the error is returned.
pub async fn connect<W: Write>(config: &ConnectionConfig, status: &mut W) -> CliResult<KafkaAdmin> {
    writeln!(
        status,
        "Connecting to Kafka at {} ({})...",
        config.bootstrap_servers,
        config.auth_mode()
    )?;

    if config.security_protocol != SecurityProtocol::Plaintext {
        if let Some((username, _)) = config.sasl.credentials() {
            let mechanism = config.sasl.mechanism.map(|m| m.as_str()).unwrap_or("-");
            writeln!(
                status,
                "  Using SASL authentication: {} (user: {})",
                mechanism, username
            )?;
        }
    }

    match KafkaAdmin::connect(config).await {
        Ok(admin) => {
            writeln!(
                status,
                "✓ Successfully connected to Kafka at {}",
                config.bootstrap_servers
            )?;
            Ok(admin)
        }
        Err(e) => {
            writeln!(status, "✗ Failed to connect to Kafka: {}", e)?;
            write!(status, "{}", connect_failure_hints())?;
            Err(e.into())
        }
    }
}
