mod common;

use common::MockAdmin;
use kafka_topic_manager::config::{ConnectionConfig, SaslConfig, SaslMechanism, SecurityProtocol};
use kafka_topic_manager::diagnostics::{
    BrokerAddress, ConnectionDiagnostic, DiagnosticProfile, probe_tcp,
};
use kafka_topic_manager::AdminError;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use std::time::Duration;
use tokio::net::TcpListener;

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    (listener, address)
}

async fn closed_port() -> String {
    let (listener, address) = listener().await;
    drop(listener);
    address
}

async fn run_with(
    profile: DiagnosticProfile,
    config: ConnectionConfig,
    result: Result<MockAdmin, AdminError>,
) -> (bool, String) {
    let diagnostic =
        ConnectionDiagnostic::new(profile, config).with_tcp_timeout(Duration::from_secs(2));
    let mut out = Vec::new();
    let passed = diagnostic
        .run(|_| async move { result }, &mut out)
        .await
        .unwrap();
    (passed, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_probe_tcp() {
    let (_listener, address) = listener().await;
    let address = BrokerAddress::parse(&address).unwrap();
    assert!(probe_tcp(&address, Duration::from_secs(2)).await.is_ok());

    let closed = BrokerAddress::parse(&closed_port().await).unwrap();
    assert!(probe_tcp(&closed, Duration::from_secs(2)).await.is_err());
}

#[tokio::test]
async fn test_all_steps_pass() {
    let (_listener, address) = listener().await;
    let admin = MockAdmin::with_topics(&["payments", "orders"]);

    let (passed, out) = run_with(
        DiagnosticProfile::Plain,
        ConnectionConfig::new(address.as_str()),
        Ok(admin),
    )
    .await;

    assert!(passed);
    assert!(out.contains("Kafka Connection Diagnostics"));
    assert!(out.contains(&format!("✓ TCP connection succeeded: {}", address)));
    assert!(out.contains("✓ Kafka client connected!"));
    assert!(out.contains("✓ Retrieved topic list (2 topics)"));
    assert!(out.find("  - orders").unwrap() < out.find("  - payments").unwrap());
    assert!(out.contains("✓ All tests passed! Kafka connection is healthy"));
}

#[tokio::test]
async fn test_tcp_failure_stops_before_client() {
    let address = closed_port().await;

    let diagnostic = ConnectionDiagnostic::new(
        DiagnosticProfile::Plain,
        ConnectionConfig::new(address.as_str()),
    );
    let mut out = Vec::new();
    let passed = diagnostic
        .run(
            |_| async { Err::<MockAdmin, _>(AdminError::Task("client step ran".to_string())) },
            &mut out,
        )
        .await
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(!passed);
    assert!(out.contains(&format!("✗ TCP connection failed: {}", address)));
    assert!(out.contains("Possible causes:"));
    assert!(out.contains("Suggestions:"));
    assert!(!out.contains("Step 2"));
}

#[tokio::test]
async fn test_node_not_ready_advice() {
    let (_listener, address) = listener().await;
    let down = AdminError::Kafka(KafkaError::MetadataFetch(RDKafkaErrorCode::AllBrokersDown));

    let (passed, out) = run_with(
        DiagnosticProfile::Plain,
        ConnectionConfig::new(address.as_str()),
        Err(down),
    )
    .await;

    assert!(!passed);
    assert!(out.contains("✗ Kafka client connection failed: "));
    assert!(out.contains("Error type: MetadataFetch(AllBrokersDown)"));
    assert!(out.contains("This error usually means:"));
    assert!(!out.contains("Step 3"));
}

#[tokio::test]
async fn test_sasl_authentication_advice() {
    let (_listener, address) = listener().await;
    let config = ConnectionConfig::new(address.as_str())
        .with_security_protocol(SecurityProtocol::SaslPlaintext)
        .with_sasl(SaslConfig::new(SaslMechanism::Plain).with_credentials("admin", "s3cr3t-pw"));
    let rejected = AdminError::Kafka(KafkaError::MetadataFetch(
        RDKafkaErrorCode::SaslAuthenticationFailed,
    ));

    let (passed, out) = run_with(DiagnosticProfile::Sasl, config, Err(rejected)).await;

    assert!(!passed);
    assert!(out.contains("Kafka SASL Authentication Diagnostics"));
    assert!(out.contains("🔐 Security protocol: SASL_PLAINTEXT"));
    assert!(out.contains("🔑 SASL mechanism: PLAIN"));
    assert!(out.contains("👤 Username: admin"));
    assert!(!out.contains("s3cr3t-pw"));
    assert!(out.contains("✗ Kafka SASL connection failed: "));
    assert!(out.contains("Authentication failed!"));
}

#[tokio::test]
async fn test_listing_failure_is_reported() {
    let (_listener, address) = listener().await;
    let timeout = AdminError::Timeout(Duration::from_secs(10));

    let (passed, out) = run_with(
        DiagnosticProfile::Sasl,
        ConnectionConfig::new(address.as_str()),
        Ok(MockAdmin::failing(timeout)),
    )
    .await;

    assert!(!passed);
    assert!(out.contains("✓ Kafka SASL authentication succeeded!"));
    assert!(out.contains("Step 3: Testing topic listing..."));
    assert!(out.contains("Error type: Timeout"));
    assert!(out.contains("Node not ready!"));
}

#[tokio::test]
async fn test_profile_overrides_client_settings() {
    let diagnostic = ConnectionDiagnostic::new(
        DiagnosticProfile::Sasl,
        ConnectionConfig::new("localhost:9092").with_client_id("custom"),
    );
    assert_eq!(diagnostic.config().client_id, "sasl-connection-test");
    assert_eq!(diagnostic.config().timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_invalid_address_is_an_error() {
    let diagnostic =
        ConnectionDiagnostic::new(DiagnosticProfile::Plain, ConnectionConfig::new("no-port"));
    let mut out = Vec::new();
    let result = diagnostic
        .run(|_| async { Ok::<_, AdminError>(MockAdmin::default()) }, &mut out)
        .await;
    assert!(result.is_err());
}
