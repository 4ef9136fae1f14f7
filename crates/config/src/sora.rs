use crate::ConfigError;

/// SubQuery indexer queried for the wallet's history elements.
const DEFAULT_SUBQUERY_URL: &str = "https://api.subquery.network/sq/sora-xor/sora-prod-sub4";

/// Public SORA node pool the asset registry rotates through.
const DEFAULT_RPC_ENDPOINTS: [&str; 4] = [
    "wss://sora.api.onfinality.io/public-ws",
    "wss://ws.mof.sora.org/",
    "wss://mof2.sora.org/",
    "wss://mof3.sora.org/",
];

#[derive(Debug, Clone)]
pub struct SoraConfig {
    /// SubQuery GraphQL endpoint serving the history-element index
    ///
    /// Env: SCAN_SORA_SUBQUERY_URL
    /// Valid schemes: http://, https://
    pub subquery_url: String,

    /// SORA node WebSocket endpoints for asset metadata lookups
    ///
    /// Env: SCAN_SORA_RPC_ENDPOINTS
    /// Format: comma-separated list of ws:// or wss:// URLs
    pub rpc_endpoints: Vec<String>,
}

impl SoraConfig {
    pub(crate) fn new(subquery_url: Option<String>, rpc_endpoints: Option<String>) -> Self {
        Self {
            subquery_url: subquery_url.unwrap_or_else(|| DEFAULT_SUBQUERY_URL.to_string()),
            rpc_endpoints: match rpc_endpoints {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => DEFAULT_RPC_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_url(&self.subquery_url, &["http", "https"])?;

        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::ValidateError(
                "At least one SORA RPC endpoint is required".to_string(),
            ));
        }

        let mut seen_urls = std::collections::HashSet::new();
        for endpoint in &self.rpc_endpoints {
            Self::validate_url(endpoint, &["ws", "wss"])?;

            if !seen_urls.insert(endpoint.clone()) {
                return Err(ConfigError::ValidateError(format!(
                    "Duplicate URL found in RPC endpoint configuration: {}",
                    endpoint
                )));
            }
        }

        Ok(())
    }

    fn validate_url(url_str: &str, schemes: &[&str]) -> Result<(), ConfigError> {
        if url_str.is_empty() {
            return Err(ConfigError::ValidateError(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(url_str)
            .map_err(|e| ConfigError::ValidateError(format!("Invalid URL '{}': {}", url_str, e)))?;

        if !schemes.contains(&parsed.scheme()) {
            return Err(ConfigError::ValidateError(format!(
                "Invalid URL scheme '{}' for '{}'. Must be one of: {}",
                parsed.scheme(),
                url_str,
                schemes.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for SoraConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sora_config() {
        let config = SoraConfig::default();
        assert_eq!(config.subquery_url, DEFAULT_SUBQUERY_URL);
        assert_eq!(config.rpc_endpoints.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_list_parsing() {
        let config = SoraConfig::new(
            None,
            Some("wss://a.example/, wss://b.example/,".to_string()),
        );
        assert_eq!(config.rpc_endpoints, vec!["wss://a.example/", "wss://b.example/"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_endpoint_list_rejected() {
        let config = SoraConfig::new(None, Some("".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint_scheme_rejected() {
        let config = SoraConfig::new(None, Some("https://not-a-socket.example/".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_endpoints_rejected() {
        let config = SoraConfig::new(
            None,
            Some("wss://a.example/,wss://a.example/".to_string()),
        );
        assert!(config.validate().is_err());
    }
}
