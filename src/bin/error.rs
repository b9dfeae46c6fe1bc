//! CLI Error types and handling
//!
//! Broker-side failures of an operation are reported by the topic manager
//! itself; the errors here are the ones that end the process with exit code 1.

use kafka_topic_manager::AdminError;
use kafka_topic_manager::config::ConfigError;
use std::fmt;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    NoCommand,
    UnknownCommand(String),
    ConfigurationError(String),
    ParseError { field: String, message: String },
    BrokerError { kind: BrokerErrorKind, message: String },
    IoError(std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerErrorKind {
    ConnectionFailed,
    AuthenticationFailed,
    Timeout,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoCommand => {
                write!(f, "No command provided. Use --help to see available commands")
            }
            CliError::UnknownCommand(cmd) => {
                write!(f, "Unknown command '{}'. Use --help to see available commands", cmd)
            }
            CliError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ParseError { field, message } => {
                write!(f, "Parse error for {}: {}", field, message)
            }
            CliError::BrokerError { kind, message } => {
                let kind_str = match kind {
                    BrokerErrorKind::ConnectionFailed => "Connection error",
                    BrokerErrorKind::AuthenticationFailed => "Authentication error",
                    BrokerErrorKind::Timeout => "Timeout",
                };
                write!(f, "{}: {}", kind_str, message)
            }
            CliError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::ConfigurationError(err.to_string())
    }
}

impl From<AdminError> for CliError {
    fn from(err: AdminError) -> Self {
        use kafka_topic_manager::diagnostics::FailureKind;

        let kind = match (&err, FailureKind::classify(&err)) {
            (AdminError::Timeout(_), _) => BrokerErrorKind::Timeout,
            (_, FailureKind::Authentication) => BrokerErrorKind::AuthenticationFailed,
            _ => BrokerErrorKind::ConnectionFailed,
        };
        CliError::BrokerError {
            kind,
            message: err.to_string(),
        }
    }
}
