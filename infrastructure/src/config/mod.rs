//! Configuration loading for lmagent
//!
//! Handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LMAGENT_*` environment variables
//! 2. `--config <path>` specified file (JSON or TOML)
//! 3. Project: `./lmagent.toml`, then `./config.json`
//! 4. Global: `~/.config/lmagent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileToolEntry};
pub use loader::{ConfigLoader, ENV_PREFIX};
