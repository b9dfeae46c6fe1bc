//! Logger setup shared by the binaries.
//!
//! Reports go to stdout; log records (ours, through `tracing`'s `log`
//! feature, and librdkafka's) go to stderr through a single `TermLogger`.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub const ENV_LOG_LEVEL: &str = "KTM_LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Parse a level name, falling back to the default for unknown names.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Install the stderr logger at the level named by `KTM_LOG_LEVEL`.
///
/// Calling this twice is harmless; the second logger is not installed.
pub fn init() -> LevelFilter {
    let level = parse_level(std::env::var(ENV_LOG_LEVEL).ok().as_deref());

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    if TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        log::debug!("logger already installed");
    }

    level
}
