//! Remote event sources feeding the normalizer: the SubQuery history
//! index for SORA and an Etherscan-compatible API for Ethereum.

pub mod etherscan;
pub mod subquery;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    BadResponse(String),
}
