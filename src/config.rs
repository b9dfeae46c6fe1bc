//! Connection parameters for the wrapped admin client.
//!
//! A [`ConnectionConfig`] is assembled once per invocation from defaults,
//! environment overrides and command-line flags, validated, and then turned
//! into an [`rdkafka::ClientConfig`].

use rdkafka::ClientConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BOOTSTRAP_SERVERS: &str = "localhost:9092";
pub const DEFAULT_CLIENT_ID: &str = "kafka-topic-manager";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const CONNECTIONS_MAX_IDLE_MS: u64 = 540_000;
const METADATA_MAX_AGE_MS: u64 = 300_000;

pub const ENV_BOOTSTRAP_SERVERS: &str = "KTM_BOOTSTRAP_SERVERS";
pub const ENV_TIMEOUT_MS: &str = "KTM_TIMEOUT_MS";
pub const ENV_SASL_USERNAME: &str = "KTM_SASL_USERNAME";
pub const ENV_SASL_PASSWORD: &str = "KTM_SASL_PASSWORD";

/// Configuration errors, raised before any connection is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown security protocol '{0}' (expected PLAINTEXT, SASL_PLAINTEXT, SASL_SSL or SSL)")]
    UnknownSecurityProtocol(String),

    #[error("unknown SASL mechanism '{0}' (expected PLAIN, SCRAM-SHA-256, SCRAM-SHA-512 or GSSAPI)")]
    UnknownSaslMechanism(String),

    #[error("--sasl-mechanism is required when using {0}")]
    MissingSaslMechanism(SecurityProtocol),

    #[error("--sasl-username and --sasl-password are required for {0}")]
    MissingCredentials(SaslMechanism),

    #[error("bootstrap server address must not be empty")]
    EmptyBootstrapServers,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityProtocol {
    #[default]
    Plaintext,
    SaslPlaintext,
    SaslSsl,
    Ssl,
}

impl SecurityProtocol {
    pub const VARIANTS: [&'static str; 4] = ["PLAINTEXT", "SASL_PLAINTEXT", "SASL_SSL", "SSL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityProtocol::Plaintext => "PLAINTEXT",
            SecurityProtocol::SaslPlaintext => "SASL_PLAINTEXT",
            SecurityProtocol::SaslSsl => "SASL_SSL",
            SecurityProtocol::Ssl => "SSL",
        }
    }
}

impl fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityProtocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLAINTEXT" => Ok(SecurityProtocol::Plaintext),
            "SASL_PLAINTEXT" => Ok(SecurityProtocol::SaslPlaintext),
            "SASL_SSL" => Ok(SecurityProtocol::SaslSsl),
            "SSL" => Ok(SecurityProtocol::Ssl),
            _ => Err(ConfigError::UnknownSecurityProtocol(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[serde(rename = "PLAIN")]
    Plain,
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "SCRAM-SHA-512")]
    ScramSha512,
    #[serde(rename = "GSSAPI")]
    Gssapi,
}

impl SaslMechanism {
    pub const VARIANTS: [&'static str; 4] = ["PLAIN", "SCRAM-SHA-256", "SCRAM-SHA-512", "GSSAPI"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaslMechanism::Plain => "PLAIN",
            SaslMechanism::ScramSha256 => "SCRAM-SHA-256",
            SaslMechanism::ScramSha512 => "SCRAM-SHA-512",
            SaslMechanism::Gssapi => "GSSAPI",
        }
    }

    /// Whether the mechanism authenticates with a username and password.
    ///
    /// GSSAPI takes its identity from the Kerberos ticket cache instead.
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, SaslMechanism::Gssapi)
    }
}

impl fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaslMechanism {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLAIN" => Ok(SaslMechanism::Plain),
            "SCRAM-SHA-256" => Ok(SaslMechanism::ScramSha256),
            "SCRAM-SHA-512" => Ok(SaslMechanism::ScramSha512),
            "GSSAPI" => Ok(SaslMechanism::Gssapi),
            _ => Err(ConfigError::UnknownSaslMechanism(s.to_string())),
        }
    }
}

/// SASL settings. Credentials stay optional so that GSSAPI can be expressed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaslConfig {
    pub mechanism: Option<SaslMechanism>,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl SaslConfig {
    pub fn new(mechanism: SaslMechanism) -> Self {
        Self {
            mechanism: Some(mechanism),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Username and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

// Never print the password.
impl fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslConfig")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Everything needed to construct the admin client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub bootstrap_servers: String,
    pub client_id: String,
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
    pub security_protocol: SecurityProtocol,
    pub sasl: SaslConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: DEFAULT_BOOTSTRAP_SERVERS.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            security_protocol: SecurityProtocol::Plaintext,
            sasl: SaslConfig::default(),
        }
    }
}

impl ConnectionConfig {
    pub fn new(bootstrap_servers: impl Into<String>) -> Self {
        Self::default().with_bootstrap_servers(bootstrap_servers)
    }

    pub fn with_bootstrap_servers(mut self, servers: impl Into<String>) -> Self {
        self.bootstrap_servers = servers.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_security_protocol(mut self, protocol: SecurityProtocol) -> Self {
        self.security_protocol = protocol;
        self
    }

    pub fn with_sasl(mut self, sasl: SaslConfig) -> Self {
        self.sasl = sasl;
        self
    }

    /// Overwrite settings from `KTM_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// explicit lookup. Values that fail to parse are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(servers) = lookup(ENV_BOOTSTRAP_SERVERS) {
            if !servers.trim().is_empty() {
                self.bootstrap_servers = servers;
            }
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            if let Ok(ms) = timeout.trim().parse::<u64>() {
                self.timeout = Duration::from_millis(ms);
            }
        }

        if let Some(username) = lookup(ENV_SASL_USERNAME) {
            self.sasl.username = Some(username);
        }

        if let Some(password) = lookup(ENV_SASL_PASSWORD) {
            self.sasl.password = Some(password);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.bootstrap_servers.trim().is_empty() {
            return Err(ConfigError::EmptyBootstrapServers);
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        if self.security_protocol != SecurityProtocol::Plaintext && self.sasl.mechanism.is_none() {
            return Err(ConfigError::MissingSaslMechanism(self.security_protocol));
        }

        if let Some(mechanism) = self.sasl.mechanism {
            if self.security_protocol != SecurityProtocol::Plaintext
                && mechanism.requires_credentials()
                && self.sasl.credentials().is_none()
            {
                return Err(ConfigError::MissingCredentials(mechanism));
            }
        }

        Ok(())
    }

    /// Whether the connection is authenticated, for display.
    pub fn auth_mode(&self) -> &'static str {
        if self.security_protocol == SecurityProtocol::Plaintext {
            "unauthenticated"
        } else {
            "authenticated"
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Translate into librdkafka properties.
    ///
    /// Security settings are only applied for protocols other than PLAINTEXT,
    /// and credentials only when both halves are present.
    pub fn to_client_config(&self) -> ClientConfig {
        let timeout_ms = self.timeout_ms().to_string();

        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("client.id", &self.client_id)
            .set("socket.timeout.ms", &timeout_ms)
            .set("api.version.request.timeout.ms", &timeout_ms)
            .set("connections.max.idle.ms", CONNECTIONS_MAX_IDLE_MS.to_string())
            .set("metadata.max.age.ms", METADATA_MAX_AGE_MS.to_string())
            // A metadata request for a missing topic must not create it.
            .set("allow.auto.create.topics", "false");

        if self.security_protocol != SecurityProtocol::Plaintext {
            config.set("security.protocol", self.security_protocol.as_str());

            if let Some(mechanism) = self.sasl.mechanism {
                config.set("sasl.mechanism", mechanism.as_str());
            }

            if let Some((username, password)) = self.sasl.credentials() {
                config
                    .set("sasl.username", username)
                    .set("sasl.password", password);
            }
        }

        config
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sasl_plain() -> ConnectionConfig {
        ConnectionConfig::new("broker:9093")
            .with_security_protocol(SecurityProtocol::SaslPlaintext)
            .with_sasl(SaslConfig::new(SaslMechanism::Plain).with_credentials("admin", "admin-secret"))
    }

    #[test]
    fn test_config_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.bootstrap_servers, "localhost:9092");
        assert_eq!(config.client_id, "kafka-topic-manager");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.security_protocol, SecurityProtocol::Plaintext);
        assert!(config.validate().is_ok());
        assert_eq!(config.auth_mode(), "unauthenticated");
    }

    #[test]
    fn test_protocol_and_mechanism_parsing() {
        assert_eq!("sasl_ssl".parse::<SecurityProtocol>(), Ok(SecurityProtocol::SaslSsl));
        assert_eq!("SCRAM-SHA-512".parse::<SaslMechanism>(), Ok(SaslMechanism::ScramSha512));
        assert!(matches!(
            "TLS".parse::<SecurityProtocol>(),
            Err(ConfigError::UnknownSecurityProtocol(_))
        ));
        assert!(matches!(
            "OAUTHBEARER".parse::<SaslMechanism>(),
            Err(ConfigError::UnknownSaslMechanism(_))
        ));
    }

    #[test]
    fn test_plaintext_client_config_has_no_security_keys() {
        let config = ConnectionConfig::new("kafka-broker:9092")
            .with_sasl(SaslConfig::new(SaslMechanism::Plain).with_credentials("u", "p"))
            .to_client_config();

        assert_eq!(config.get("bootstrap.servers"), Some("kafka-broker:9092"));
        assert_eq!(config.get("client.id"), Some("kafka-topic-manager"));
        assert_eq!(config.get("socket.timeout.ms"), Some("30000"));
        assert_eq!(config.get("api.version.request.timeout.ms"), Some("30000"));
        assert_eq!(config.get("connections.max.idle.ms"), Some("540000"));
        assert_eq!(config.get("metadata.max.age.ms"), Some("300000"));
        assert_eq!(config.get("allow.auto.create.topics"), Some("false"));
        assert_eq!(config.get("security.protocol"), None);
        assert_eq!(config.get("sasl.mechanism"), None);
        assert_eq!(config.get("sasl.username"), None);
    }

    #[test]
    fn test_sasl_client_config() {
        let config = sasl_plain().to_client_config();

        assert_eq!(config.get("security.protocol"), Some("SASL_PLAINTEXT"));
        assert_eq!(config.get("sasl.mechanism"), Some("PLAIN"));
        assert_eq!(config.get("sasl.username"), Some("admin"));
        assert_eq!(config.get("sasl.password"), Some("admin-secret"));
    }

    #[test]
    fn test_partial_credentials_are_not_applied() {
        let mut sasl = SaslConfig::new(SaslMechanism::Gssapi);
        sasl.username = Some("kafka".to_string());

        let config = ConnectionConfig::new("broker:9093")
            .with_security_protocol(SecurityProtocol::SaslSsl)
            .with_sasl(sasl);

        assert!(config.validate().is_ok());
        let client = config.to_client_config();
        assert_eq!(client.get("sasl.mechanism"), Some("GSSAPI"));
        assert_eq!(client.get("sasl.username"), None);
    }

    #[test]
    fn test_validation_rules() {
        assert!(sasl_plain().validate().is_ok());

        let missing_mechanism =
            ConnectionConfig::default().with_security_protocol(SecurityProtocol::SaslPlaintext);
        assert_eq!(
            missing_mechanism.validate(),
            Err(ConfigError::MissingSaslMechanism(SecurityProtocol::SaslPlaintext))
        );

        let missing_password = ConnectionConfig::default()
            .with_security_protocol(SecurityProtocol::SaslSsl)
            .with_sasl(SaslConfig {
                mechanism: Some(SaslMechanism::ScramSha256),
                username: Some("admin".to_string()),
                password: None,
            });
        assert_eq!(
            missing_password.validate(),
            Err(ConfigError::MissingCredentials(SaslMechanism::ScramSha256))
        );

        let ssl_only = ConnectionConfig::default().with_security_protocol(SecurityProtocol::Ssl);
        assert_eq!(
            ssl_only.validate(),
            Err(ConfigError::MissingSaslMechanism(SecurityProtocol::Ssl))
        );
        assert_eq!(ssl_only.auth_mode(), "authenticated");

        let ssl_scram = ssl_only.with_sasl(
            SaslConfig::new(SaslMechanism::ScramSha512).with_credentials("admin", "admin-secret"),
        );
        assert!(ssl_scram.validate().is_ok());

        let empty = ConnectionConfig::new("  ");
        assert_eq!(empty.validate(), Err(ConfigError::EmptyBootstrapServers));

        let zero = ConnectionConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BOOTSTRAP_SERVERS, "kafka-1:9092,kafka-2:9092"),
            (ENV_TIMEOUT_MS, "not-a-number"),
            (ENV_SASL_USERNAME, "svc"),
            (ENV_SASL_PASSWORD, "hunter2"),
        ]);

        let mut config = ConnectionConfig::default();
        config.apply_env_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.bootstrap_servers, "kafka-1:9092,kafka-2:9092");
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.sasl.credentials(), Some(("svc", "hunter2")));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", sasl_plain());
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("admin-secret"));
    }
}
