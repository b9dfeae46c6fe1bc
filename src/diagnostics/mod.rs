//! Broker reachability diagnostics.
//!
//! A diagnosis runs in three steps and stops at the first failure:
//!
//! 1. open and close a raw TCP connection to the first bootstrap address;
//! 2. connect through the admin client (plain or SASL);
//! 3. list topics through that client.
//!
//! Client failures are classified into a [`FailureKind`] to pick the
//! troubleshooting advice that gets printed.

pub mod help;

use rdkafka::error::RDKafkaErrorCode;
use std::fmt;
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::admin::{AdminError, AdminResult, TopicAdmin};
use crate::config::ConnectionConfig;
use crate::manager::rule;

pub const TCP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const PLAIN_CLIENT_ID: &str = "connection-test";
pub const PLAIN_TIMEOUT: Duration = Duration::from_secs(10);
pub const SASL_CLIENT_ID: &str = "sasl-connection-test";
pub const SASL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum DiagnosticError {
    #[error("Invalid broker address '{0}' (expected host:port)")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type DiagnosticResult<T> = Result<T, DiagnosticError>;

/// Host and port of the broker probed in step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
}

impl BrokerAddress {
    /// Parse the first entry of a comma-separated bootstrap list.
    pub fn parse(servers: &str) -> DiagnosticResult<Self> {
        let invalid = || DiagnosticError::InvalidAddress(servers.to_string());

        let first = servers.split(',').next().unwrap_or_default().trim();
        let (host, port) = first.rsplit_once(':').ok_or_else(invalid)?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Open a TCP connection and close it straight away.
pub async fn probe_tcp(address: &BrokerAddress, limit: Duration) -> io::Result<()> {
    let stream = timeout(limit, TcpStream::connect((address.host.as_str(), address.port)))
        .await
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no answer from {} within {:?}", address, limit),
            )
        })??;
    drop(stream);
    Ok(())
}

/// Coarse class of a client-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials or mechanism rejected.
    Authentication,
    /// The broker did not answer or is not serving yet.
    NodeNotReady,
    Other,
}

impl FailureKind {
    pub fn classify(error: &AdminError) -> Self {
        let code = error.code();

        if matches!(
            code,
            Some(RDKafkaErrorCode::Authentication | RDKafkaErrorCode::SaslAuthenticationFailed)
        ) || error.to_string().contains("Authentication")
        {
            return FailureKind::Authentication;
        }

        match code {
            Some(
                RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::BrokerTransportFailure
                | RDKafkaErrorCode::BrokerNotAvailable
                | RDKafkaErrorCode::LeaderNotAvailable
                | RDKafkaErrorCode::NetworkException
                | RDKafkaErrorCode::OperationTimedOut
                | RDKafkaErrorCode::RequestTimedOut,
            ) => FailureKind::NodeNotReady,
            _ => FailureKind::Other,
        }
    }
}

/// Which of the two diagnostic programs is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticProfile {
    Plain,
    Sasl,
}

impl DiagnosticProfile {
    fn title(&self) -> &'static str {
        match self {
            DiagnosticProfile::Plain => "Kafka Connection Diagnostics",
            DiagnosticProfile::Sasl => "Kafka SASL Authentication Diagnostics",
        }
    }

    fn client_step(&self) -> &'static str {
        match self {
            DiagnosticProfile::Plain => "Step 2: Testing Kafka client connection...",
            DiagnosticProfile::Sasl => "Step 2: Testing Kafka SASL authenticated connection...",
        }
    }

    fn client_success(&self) -> &'static str {
        match self {
            DiagnosticProfile::Plain => "✓ Kafka client connected!",
            DiagnosticProfile::Sasl => "✓ Kafka SASL authentication succeeded!",
        }
    }

    fn client_failure(&self) -> &'static str {
        match self {
            DiagnosticProfile::Plain => "✗ Kafka client connection failed",
            DiagnosticProfile::Sasl => "✗ Kafka SASL connection failed",
        }
    }

    fn all_passed(&self) -> &'static str {
        match self {
            DiagnosticProfile::Plain => "✓ All tests passed! Kafka connection is healthy",
            DiagnosticProfile::Sasl => "✓ All tests passed! Kafka SASL connection is healthy",
        }
    }

    /// Client id and timeout the profile connects with.
    pub fn client_settings(&self) -> (&'static str, Duration) {
        match self {
            DiagnosticProfile::Plain => (PLAIN_CLIENT_ID, PLAIN_TIMEOUT),
            DiagnosticProfile::Sasl => (SASL_CLIENT_ID, SASL_TIMEOUT),
        }
    }

    /// Troubleshooting advice for a failure, if this profile has any.
    pub fn advice(&self, kind: FailureKind) -> Option<&'static str> {
        match (self, kind) {
            (DiagnosticProfile::Plain, FailureKind::NodeNotReady) => Some(
                "This error usually means:
  1. The Kafka broker is not ready to accept connections yet
  2. The broker's advertised.listeners setting is wrong
  3. Network latency or a timeout

How to fix:
  1. Wait a few seconds and try again
  2. Check the broker's server.properties
  3. Increase the timeout
",
            ),
            (DiagnosticProfile::Sasl, FailureKind::Authentication) => Some(
                "Authentication failed!
  Possible causes:
  1. Wrong username or password
  2. The SASL mechanism does not match the broker's
  3. SASL authentication is not enabled on the broker

  How to fix:
  1. Check the users in kafka_server_jaas.conf
  2. Make sure the right SASL mechanism is used
  3. Restart Kafka: docker-compose restart kafka
",
            ),
            (DiagnosticProfile::Sasl, FailureKind::NodeNotReady) => Some(
                "Node not ready!
  Possible causes:
  1. The Kafka broker is not ready to accept connections yet
  2. The broker's advertised.listeners setting is wrong

  How to fix:
  1. Wait a few seconds and try again
  2. Check the broker configuration
",
            ),
            _ => None,
        }
    }
}

/// One run of the TCP / client / topic-list checks.
pub struct ConnectionDiagnostic {
    profile: DiagnosticProfile,
    config: ConnectionConfig,
    tcp_timeout: Duration,
}

impl ConnectionDiagnostic {
    /// The client id and timeout of `config` are replaced by the profile's.
    pub fn new(profile: DiagnosticProfile, config: ConnectionConfig) -> Self {
        let (client_id, client_timeout) = profile.client_settings();
        Self {
            profile,
            config: config.with_client_id(client_id).with_timeout(client_timeout),
            tcp_timeout: TCP_PROBE_TIMEOUT,
        }
    }

    pub fn with_tcp_timeout(mut self, limit: Duration) -> Self {
        self.tcp_timeout = limit;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Run all steps, writing the report to `out`. Returns whether every
    /// step passed.
    pub async fn run<A, F, Fut, W>(&self, connect: F, out: &mut W) -> DiagnosticResult<bool>
    where
        A: TopicAdmin,
        F: FnOnce(ConnectionConfig) -> Fut,
        Fut: Future<Output = AdminResult<A>>,
        W: Write,
    {
        let address = BrokerAddress::parse(&self.config.bootstrap_servers)?;

        writeln!(out, "{}", rule())?;
        writeln!(out, "{}", self.profile.title())?;
        writeln!(out, "{}", rule())?;
        writeln!(out)?;
        writeln!(out, "📍 Testing connection: {}", address)?;
        if self.profile == DiagnosticProfile::Sasl {
            writeln!(out, "🔐 Security protocol: {}", self.config.security_protocol)?;
            let mechanism = self.config.sasl.mechanism.map(|m| m.as_str()).unwrap_or("-");
            writeln!(out, "🔑 SASL mechanism: {}", mechanism)?;
            let username = self.config.sasl.username.as_deref().unwrap_or("-");
            writeln!(out, "👤 Username: {}", username)?;
        }
        writeln!(out)?;

        writeln!(out, "Step 1: Testing TCP connection...")?;
        if let Err(e) = probe_tcp(&address, self.tcp_timeout).await {
            warn!(address = %address, error = %e, "tcp probe failed");
            self.report_tcp_failure(&address, out)?;
            return Ok(false);
        }
        debug!(address = %address, "tcp probe succeeded");
        writeln!(out, "✓ TCP connection succeeded: {}", address)?;
        writeln!(out)?;

        writeln!(out, "{}", self.profile.client_step())?;
        let admin = match connect(self.config.clone()).await {
            Ok(admin) => admin,
            Err(e) => {
                self.report_client_failure(&e, out)?;
                return Ok(false);
            }
        };
        writeln!(out, "{}", self.profile.client_success())?;

        writeln!(out)?;
        writeln!(out, "Step 3: Testing topic listing...")?;
        let mut topics = match admin.list_topics().await {
            Ok(topics) => topics,
            Err(e) => {
                self.report_client_failure(&e, out)?;
                return Ok(false);
            }
        };
        topics.sort();
        writeln!(out, "✓ Retrieved topic list ({} topics)", topics.len())?;

        if !topics.is_empty() {
            writeln!(out, "\nCurrent topics:")?;
            for topic in &topics {
                writeln!(out, "  - {}", topic)?;
            }
        }
        drop(admin);

        writeln!(out)?;
        writeln!(out, "{}", rule())?;
        writeln!(out, "{}", self.profile.all_passed())?;
        writeln!(out, "{}", rule())?;

        Ok(true)
    }

    fn report_tcp_failure<W: Write>(&self, address: &BrokerAddress, out: &mut W) -> io::Result<()> {
        writeln!(out, "✗ TCP connection failed: {}", address)?;
        writeln!(out)?;
        writeln!(out, "Possible causes:")?;
        writeln!(out, "  1. The Kafka server is not running")?;
        writeln!(out, "  2. A firewall is blocking the connection")?;
        writeln!(out, "  3. The address or port is wrong")?;

        if self.profile == DiagnosticProfile::Plain {
            writeln!(out)?;
            writeln!(out, "Suggestions:")?;
            writeln!(out, "  - Check that Kafka is running")?;
            writeln!(out, "  - Start Kafka with Docker (see below)")?;
            writeln!(out, "  - Check the firewall settings")?;
        }

        Ok(())
    }

    fn report_client_failure<W: Write>(&self, error: &AdminError, out: &mut W) -> io::Result<()> {
        let kind = FailureKind::classify(error);
        warn!(error = %error, ?kind, "client check failed");

        writeln!(out, "{}: {}", self.profile.client_failure(), error)?;
        writeln!(out)?;
        writeln!(out, "Error type: {}", error.kind_name())?;
        writeln!(out)?;

        if let Some(advice) = self.profile.advice(kind) {
            write!(out, "{}", advice)?;
        }

        Ok(())
    }
}
