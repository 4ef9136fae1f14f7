use crate::ConfigError;

const DEFAULT_API_URL: &str = "https://api.etherscan.io/api";

#[derive(Debug, Clone)]
pub struct EthConfig {
    /// Etherscan-compatible API endpoint
    ///
    /// Env: SCAN_ETH_API_URL
    /// Valid schemes: http://, https://
    pub api_url: String,

    /// Etherscan API key. The Ethereum scan is skipped when unset.
    ///
    /// Env: SCAN_ETH_API_KEY
    pub api_key: Option<String>,
}

impl EthConfig {
    pub(crate) fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api_url).map_err(|e| {
            ConfigError::ValidateError(format!("Invalid URL '{}': {}", self.api_url, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::ValidateError(format!(
                "Invalid URL scheme '{}'. Must be http:// or https://",
                scheme
            ))),
        }
    }
}

impl Default for EthConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eth_config() {
        let config = EthConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let config = EthConfig::new(None, Some("".to_string()));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let config = EthConfig::new(Some("ftp://example.com".to_string()), None);
        assert!(config.validate().is_err());
    }
}
