//! Configuration
//!
//! Layered configuration loaded with the `config` crate: built-in defaults,
//! then the global config file, then an explicit file, then `REMARK__*`
//! environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

pub use facade::ConfigLoader;
pub use storage::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemarkConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RemarkConfig {
    /// Render as TOML, e.g. for writing a starter config file
    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self).map_err(|e| {
            crate::error::ApiError::ConfigError(format!("Failed to serialize config: {}", e))
        })
    }
}
