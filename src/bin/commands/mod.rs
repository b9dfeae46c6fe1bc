pub mod connection;
pub mod topic;

pub use connection::{connect, connection_config, output_format};
pub use topic::{
    handle_topic_create_command, handle_topic_delete_command, handle_topic_describe_command,
    handle_topic_list_command,
};
