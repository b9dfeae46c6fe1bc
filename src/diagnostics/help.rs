//! Canned troubleshooting text printed by the binaries.

use crate::manager::rule;

/// Printed by `kafka-topic-manager` when it cannot connect.
pub fn connect_failure_hints() -> &'static str {
    "\nHints:
  1. Make sure the Kafka server is running
  2. If authentication is enabled, check the username and password
  3. Run 'test-connection' to diagnose the connection
  4. If you have no Kafka at hand, start one with 'docker-compose up -d'
"
}

/// Three ways to get a local broker running.
pub fn docker_help() -> String {
    let dashes = "-".repeat(60);
    format!(
        "\n{rule}\nHow to start Kafka with Docker\n{rule}\n\n\
         Option 1: Docker Compose (recommended)\n{dashes}\n{compose}\n\n\
         Option 2: plain docker commands\n{dashes}\n{docker_run}\n\n\
         Option 3: Redpanda (lightweight alternative)\n{dashes}\n{redpanda}\n",
        rule = rule(),
        dashes = dashes,
        compose = COMPOSE_HELP,
        docker_run = DOCKER_RUN_HELP,
        redpanda = REDPANDA_HELP,
    )
}

const COMPOSE_HELP: &str = "
Create a docker-compose.yml file:

version: '3'
services:
  zookeeper:
    image: confluentinc/cp-zookeeper:latest
    environment:
      ZOOKEEPER_CLIENT_PORT: 2181
      ZOOKEEPER_TICK_TIME: 2000
    ports:
      - \"2181:2181\"

  kafka:
    image: confluentinc/cp-kafka:latest
    depends_on:
      - zookeeper
    ports:
      - \"9092:9092\"
    environment:
      KAFKA_BROKER_ID: 1
      KAFKA_ZOOKEEPER_CONNECT: zookeeper:2181
      KAFKA_ADVERTISED_LISTENERS: PLAINTEXT://localhost:9092
      KAFKA_LISTENER_SECURITY_PROTOCOL_MAP: PLAINTEXT:PLAINTEXT
      KAFKA_INTER_BROKER_LISTENER_NAME: PLAINTEXT
      KAFKA_OFFSETS_TOPIC_REPLICATION_FACTOR: 1

Then run:
  docker-compose up -d
";

const DOCKER_RUN_HELP: &str = "
# 1. Start Zookeeper
docker run -d --name zookeeper \\
  -p 2181:2181 \\
  -e ZOOKEEPER_CLIENT_PORT=2181 \\
  confluentinc/cp-zookeeper:latest

# 2. Start Kafka
docker run -d --name kafka \\
  -p 9092:9092 \\
  --link zookeeper \\
  -e KAFKA_ZOOKEEPER_CONNECT=zookeeper:2181 \\
  -e KAFKA_ADVERTISED_LISTENERS=PLAINTEXT://localhost:9092 \\
  -e KAFKA_OFFSETS_TOPIC_REPLICATION_FACTOR=1 \\
  confluentinc/cp-kafka:latest
";

const REDPANDA_HELP: &str = "
docker run -d --name redpanda \\
  -p 9092:9092 \\
  docker.redpanda.com/vectorized/redpanda:latest \\
  redpanda start --smp 1 --memory 1G \\
  --kafka-addr PLAINTEXT://0.0.0.0:9092 \\
  --advertise-kafka-addr PLAINTEXT://localhost:9092
";

/// Printed after a successful SASL check.
pub fn sasl_usage_examples() -> String {
    let auth = "  --security-protocol SASL_PLAINTEXT \\
  --sasl-mechanism PLAIN \\
  --sasl-username admin \\
  --sasl-password admin-secret";

    format!(
        "\n{rule}\nUsing kafka-topic-manager against an authenticated Kafka\n{rule}\n\n\
         Examples:\n\n\
         # List topics\n\
         kafka-topic-manager list \\\n{auth}\n\n\
         # Create a topic\n\
         kafka-topic-manager create \\\n  --topic test-topic \\\n  --partitions 3 \\\n{auth}\n\n\
         # Delete a topic\n\
         kafka-topic-manager delete \\\n  --topic test-topic \\\n{auth}\n",
        rule = rule(),
        auth = auth,
    )
}

/// Printed after a failed SASL check.
pub fn sasl_failure_suggestions() -> &'static str {
    "\nSuggestions:
  1. Check the Kafka container logs: docker-compose logs kafka
  2. Make sure the JAAS configuration file is loaded
  3. Verify the user credentials
"
}
