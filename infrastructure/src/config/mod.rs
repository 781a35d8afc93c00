//! Configuration file loading for innovation-casino
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CASINO_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./casino.toml` or `./.casino.toml`
//! 4. Global: `$XDG_CONFIG_HOME/innovation-casino/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCacheConfig, FileCatalogConfig, FileConfig, FileRoutingConfig, FileSessionConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX, PROJECT_CONFIG_FILES};
