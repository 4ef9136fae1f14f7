//! Asset metadata registry backed by the chain's JSON-RPC node pool.
//!
//! The registry memoizes token metadata for the lifetime of one scan and
//! degrades to documented sentinel values instead of failing the scan:
//! an unresolved ticker is the asset id itself, an unresolved precision
//! is 0, an unresolved supply is "0".

use std::collections::HashMap;
use std::time::Duration;

use jsonrpsee::core::client::{ClientT, Error as RpcError};
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::amount::format_fixed_point;
use crate::types::TokenInfo;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token metadata lookups the event normalizer depends on.
///
/// [`AssetRegistry`] is the production implementation; tests substitute a
/// static table.
#[allow(async_fn_in_trait)]
pub trait AssetLookup {
    /// Display ticker for `asset_id`; the id itself when unresolved.
    async fn ticker(&mut self, asset_id: &str) -> String;

    /// Decimal places declared for `asset_id`; 0 when unresolved.
    async fn precision(&mut self, asset_id: &str) -> u32;

    /// Total issuance of `asset_id` rendered at its precision, read at
    /// block `at` (or the latest block when `None`); "0" when
    /// unresolved.
    async fn total_supply(&mut self, asset_id: &str, at: Option<&str>) -> String;
}

/// Metadata returned by the node for one listed asset.
#[derive(Debug, Deserialize)]
struct AssetInfo {
    asset_id: String,
    symbol: String,
    name: String,
    #[serde(deserialize_with = "u32_from_number_or_string")]
    precision: u32,
}

/// Metadata returned for a single-asset query.
#[derive(Debug, Deserialize)]
struct AssetDetails {
    symbol: String,
    name: String,
    #[serde(deserialize_with = "u32_from_number_or_string")]
    precision: u32,
}

#[derive(Debug, Deserialize)]
struct SupplyInfo {
    #[serde(default)]
    balance: Option<String>,
}

pub struct AssetRegistry {
    tokens: HashMap<String, TokenInfo>,
    endpoints: Vec<String>,
    /// Next endpoint to dial when the current connection is lost.
    cursor: usize,
    client: Option<WsClient>,
}

impl AssetRegistry {
    /// Build a registry over the given endpoint pool and seed its cache
    /// from the node's full asset listing. When the listing cannot be
    /// fetched from any endpoint the cache falls back to the well-known
    /// asset set; individual lookups still retry the network later.
    pub async fn connect(endpoints: Vec<String>) -> Self {
        let mut registry = Self {
            tokens: HashMap::new(),
            endpoints,
            cursor: 0,
            client: None,
        };

        let listing = registry
            .call::<Vec<AssetInfo>>("assets_listAssetInfos", || rpc_params![])
            .await;
        match listing {
            Some(listed) => {
                tracing::info!(assets = listed.len(), "seeded asset registry from node");
                for info in listed {
                    registry.tokens.insert(
                        info.asset_id,
                        TokenInfo {
                            name: info.name,
                            symbol: info.symbol,
                            precision: info.precision,
                        },
                    );
                }
            }
            None => {
                tracing::warn!("asset listing unavailable, seeding well-known assets");
                registry.seed_defaults();
            }
        }

        registry
    }

    /// Display ticker for `asset_id`; the id itself when unresolved.
    /// Negative results are never cached, so a later call may retry the
    /// network.
    pub async fn ticker(&mut self, asset_id: &str) -> String {
        if !self.resolve(asset_id).await {
            return asset_id.to_string();
        }
        self.tokens
            .get(asset_id)
            .map(|token| token.symbol.clone())
            .unwrap_or_else(|| asset_id.to_string())
    }

    /// Decimal places declared for `asset_id`; 0 when unresolved.
    pub async fn precision(&mut self, asset_id: &str) -> u32 {
        if !self.resolve(asset_id).await {
            return 0;
        }
        self.tokens
            .get(asset_id)
            .map(|token| token.precision)
            .unwrap_or(0)
    }

    /// Total issuance of `asset_id` at block `at` (latest when `None`),
    /// rendered at the asset's precision; "0" when anything along the
    /// way is unresolved.
    pub async fn total_supply(&mut self, asset_id: &str, at: Option<&str>) -> String {
        if !self.resolve(asset_id).await {
            return "0".to_string();
        }
        let precision = self
            .tokens
            .get(asset_id)
            .map(|token| token.precision)
            .unwrap_or(0);

        let supply = match at {
            Some(block_hash) => {
                self.call::<SupplyInfo>("assets_totalSupply", || rpc_params![asset_id, block_hash])
                    .await
            }
            None => {
                self.call::<SupplyInfo>("assets_totalSupply", || rpc_params![asset_id])
                    .await
            }
        };

        let Some(SupplyInfo {
            balance: Some(balance),
        }) = supply
        else {
            return "0".to_string();
        };

        format_fixed_point(&balance, precision as i32).unwrap_or_else(|_| "0".to_string())
    }

    /// Ensure `asset_id` is cached, fetching it when missing. Returns
    /// whether the asset is known afterwards.
    async fn resolve(&mut self, asset_id: &str) -> bool {
        if self.tokens.contains_key(asset_id) {
            return true;
        }
        let Some(details) = self
            .call::<AssetDetails>("assets_getAssetInfo", || rpc_params![asset_id])
            .await
        else {
            return false;
        };
        if details.symbol.is_empty() {
            return false;
        }
        self.tokens.insert(
            asset_id.to_string(),
            TokenInfo {
                name: details.name,
                symbol: details.symbol,
                precision: details.precision,
            },
        );
        true
    }

    /// Issue one logical RPC call with endpoint failover: a lost
    /// connection rotates to the next endpoint and retries, with at most
    /// one attempt per configured endpoint. Protocol-level errors are
    /// not retried. `None` means the call degraded.
    async fn call<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: impl Fn() -> ArrayParams,
    ) -> Option<T> {
        let mut attempts = self.endpoints.len();

        while attempts > 0 {
            if self.client.is_none() && !self.reconnect().await {
                attempts -= 1;
                continue;
            }
            let Some(client) = self.client.as_ref() else {
                attempts -= 1;
                continue;
            };

            let response = client.request::<T, _>(method, params()).await;
            match response {
                Ok(value) => return Some(value),
                Err(error) if is_disconnect(&error) => {
                    tracing::debug!(method, error = %error, "rpc connection lost, rotating endpoint");
                    self.client = None;
                    attempts -= 1;
                }
                Err(error) => {
                    tracing::warn!(method, error = %error, "rpc call failed");
                    return None;
                }
            }
        }

        tracing::warn!(method, "all rpc endpoints exhausted");
        None
    }

    /// Dial the endpoint under the rotation cursor and advance it.
    async fn reconnect(&mut self) -> bool {
        let Some(url) = self.next_endpoint() else {
            return false;
        };
        match WsClientBuilder::default()
            .request_timeout(REQUEST_TIMEOUT)
            .build(&url)
            .await
        {
            Ok(client) => {
                tracing::debug!(url = %url, "connected to rpc endpoint");
                self.client = Some(client);
                true
            }
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "failed to connect to rpc endpoint");
                false
            }
        }
    }

    fn next_endpoint(&mut self) -> Option<String> {
        if self.endpoints.is_empty() {
            return None;
        }
        let url = self.endpoints[self.cursor % self.endpoints.len()].clone();
        self.cursor = (self.cursor + 1) % self.endpoints.len();
        Some(url)
    }

    /// Well-known assets used when the node listing is unavailable.
    fn seed_defaults(&mut self) {
        let defaults = [
            (
                "0x0200000000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("SORA", "XOR", 18),
            ),
            (
                "0x0200040000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("SORA Validator Token", "VAL", 18),
            ),
            (
                "0x0200050000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("Polkaswap", "PSWAP", 18),
            ),
            (
                "0x0200060000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("Dai", "DAI", 18),
            ),
            (
                "0x0200070000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("Ether", "ETH", 18),
            ),
            (
                "0x0200080000000000000000000000000000000000000000000000000000000000",
                TokenInfo::new("SORA Synthetic USD", "XSTUSD", 18),
            ),
        ];
        for (asset_id, token) in defaults {
            self.tokens.insert(asset_id.to_string(), token);
        }
    }
}

impl AssetLookup for AssetRegistry {
    async fn ticker(&mut self, asset_id: &str) -> String {
        AssetRegistry::ticker(self, asset_id).await
    }

    async fn precision(&mut self, asset_id: &str) -> u32 {
        AssetRegistry::precision(self, asset_id).await
    }

    async fn total_supply(&mut self, asset_id: &str, at: Option<&str>) -> String {
        AssetRegistry::total_supply(self, asset_id, at).await
    }
}

/// Connection-level failures rotate to the next endpoint; anything else
/// (bad params, unknown method, decode errors) will not get better on a
/// different node.
fn is_disconnect(error: &RpcError) -> bool {
    matches!(error, RpcError::RestartNeeded(_) | RpcError::Transport(_))
}

/// Nodes have served precision both as a JSON number and a string.
fn u32_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid precision: {}", n))),
        Value::String(s) => s
            .parse::<u32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid precision '{}': {}", s, e))),
        other => Err(serde::de::Error::custom(format!(
            "expected precision number, got: {}",
            other
        ))),
    }
}
