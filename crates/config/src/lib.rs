mod args;
mod error;
mod eth;
mod log;
mod sora;

pub use args::{Args, is_eth_address};
pub use error::ConfigError;
pub use eth::EthConfig;
pub use log::LogConfig;
pub use sora::SoraConfig;

use serde::Deserialize;
use std::path::PathBuf;

/// Flat view of the `SCAN_`-prefixed environment, assembled into the
/// nested [`ScanConfig`] after loading.
#[derive(Debug, Deserialize)]
struct RawEnv {
    log_level: Option<String>,
    sora_subquery_url: Option<String>,
    sora_rpc_endpoints: Option<String>,
    eth_api_url: Option<String>,
    eth_api_key: Option<String>,
    output_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub log: LogConfig,
    pub sora: SoraConfig,
    pub eth: EthConfig,

    /// Directory the CSV reports are written to.
    ///
    /// Env: SCAN_OUTPUT_DIR
    /// Default: current directory
    pub output_dir: PathBuf,
}

impl ScanConfig {
    /// Load the `.env` file at `env_file` (if present) and then the
    /// `SCAN_`-prefixed environment.
    pub fn load(env_file: &str) -> Result<Self, ConfigError> {
        dotenv::from_filename(env_file).ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = envy::prefixed("SCAN_").from_env::<RawEnv>()?;

        let config = Self {
            log: LogConfig::new(raw.log_level),
            sora: SoraConfig::new(raw.sora_subquery_url, raw.sora_rpc_endpoints),
            eth: EthConfig::new(raw.eth_api_url, raw.eth_api_key),
            output_dir: raw
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.log.validate()?;
        self.sora.validate()?;
        self.eth.validate()?;
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            sora: SoraConfig::default(),
            eth: EthConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.sora.rpc_endpoints.len(), 4);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.validate().is_ok());
    }
}
