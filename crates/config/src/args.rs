use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SS58 wallet address to collect statistics for
    pub address: String,

    /// Lowest block height to include (exclusive)
    #[arg(long = "from-height", default_value_t = 0)]
    pub from_height: u64,

    /// Ethereum address for the ERC-20 leg of the report. When omitted
    /// the Ethereum scan is skipped.
    #[arg(long = "eth-address")]
    pub eth_address: Option<String>,

    /// Path to .env file (e.g., .env.mainnet)
    #[arg(short, long, default_value = ".env")]
    pub env_file: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Basic shape check for a 20-byte hex Ethereum address.
pub fn is_eth_address(value: &str) -> bool {
    let Some(hex_part) = value.strip_prefix("0x") else {
        return false;
    };
    hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eth_address_shape() {
        assert!(is_eth_address("0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae"));
        assert!(!is_eth_address("de0b295669a9fd93d5f28d9ec85e40f4cb697bae"));
        assert!(!is_eth_address("0xde0b29"));
        assert!(!is_eth_address("0xzz0b295669a9fd93d5f28d9ec85e40f4cb697bae"));
    }
}
