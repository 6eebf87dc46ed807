//! Configuration file loading for constitutional-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. Global: `~/.config/constitutional-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    CHECK_KINDS, FileAgentsConfig, FileCheckConfig, FileConfig, FileCouncilConfig,
    FileDebateConfig, FileGateConfig, FileLoggingConfig, FileOutputConfig, FilePathsConfig,
    FileServerConfig,
};
pub use loader::ConfigLoader;
