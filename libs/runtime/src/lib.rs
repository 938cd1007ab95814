//! Process-level plumbing shared by SmartUtility binaries: layered
//! configuration, home directory resolution and logging initialization.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{default_logging_config, AppConfig, CliArgs, LoggingConfig, Section};
pub use paths::resolve_home_dir;
