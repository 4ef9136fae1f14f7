//! Classification of raw history elements into typed calls.
//!
//! Each recognized (module, method) pair maps to one [`CallKind`]
//! variant with a strongly-typed payload; a missing payload key is a
//! [`NormalizeError`], not a silent default.

use serde_json::Value;
use thiserror::Error;

use crate::amount::AmountError;
use crate::types::HistoryElement;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("missing payload field `{0}`")]
    MissingField(&'static str),

    #[error("expected list payload")]
    ExpectedList,

    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// One reward claimed in a claim batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardItem {
    pub asset_id: String,
    pub amount: String,
}

/// A recognized call with its typed payload, or `Unrecognized`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallKind {
    /// assets.transfer
    Transfer {
        from: String,
        to: String,
        amount: String,
        asset_id: String,
    },
    /// assets.register
    Register { asset_id: String },
    /// liquidityProxy.swap
    Swap {
        base_asset_id: String,
        base_amount: String,
        target_asset_id: String,
        target_amount: String,
        lp_fee: String,
    },
    /// poolXYK.depositLiquidity / poolXYK.withdrawLiquidity
    Liquidity {
        withdraw: bool,
        base_asset_id: String,
        base_amount: String,
        target_asset_id: String,
        target_amount: String,
    },
    /// ethBridge.transferToSidechain
    BridgeOut {
        asset_id: String,
        amount: String,
        sidechain_address: String,
    },
    /// referrals.reserve / referrals.unreserve
    Referral {
        from: String,
        to: String,
        amount: String,
    },
    /// The claim family: pswapDistribution.claimIncentive,
    /// rewards.claim, vestedRewards.claimRewards,
    /// vestedRewards.claimCrowdloanRewards
    RewardClaim { items: Vec<RewardItem> },
    /// utility.batchAll; items stay raw until one of them is matched
    /// and expanded.
    Batch { calls: Vec<Value> },
    Unrecognized,
}

impl CallKind {
    pub fn classify(event: &HistoryElement) -> Result<Self, NormalizeError> {
        Self::from_parts(&event.module, &event.method, &event.data)
    }

    /// Classify a (module, method, payload) triple. Also used for calls
    /// synthesized out of a batch.
    pub fn from_parts(module: &str, method: &str, data: &Value) -> Result<Self, NormalizeError> {
        match (module, method) {
            ("assets", "transfer") => Ok(Self::Transfer {
                from: field(data, "from")?,
                to: field(data, "to")?,
                amount: field(data, "amount")?,
                asset_id: field(data, "assetId")?,
            }),
            ("assets", "register") => Ok(Self::Register {
                asset_id: field(data, "assetId")?,
            }),
            ("liquidityProxy", "swap") => Ok(Self::Swap {
                base_asset_id: field(data, "baseAssetId")?,
                base_amount: field(data, "baseAssetAmount")?,
                target_asset_id: field(data, "targetAssetId")?,
                target_amount: field(data, "targetAssetAmount")?,
                lp_fee: field(data, "liquidityProviderFee")?,
            }),
            (m, "depositLiquidity" | "withdrawLiquidity") if m.eq_ignore_ascii_case("poolxyk") => {
                Ok(Self::Liquidity {
                    withdraw: method == "withdrawLiquidity",
                    base_asset_id: field(data, "baseAssetId")?,
                    base_amount: field(data, "baseAssetAmount")?,
                    target_asset_id: field(data, "targetAssetId")?,
                    target_amount: field(data, "targetAssetAmount")?,
                })
            }
            ("ethBridge", "transferToSidechain") => Ok(Self::BridgeOut {
                asset_id: field(data, "assetId")?,
                amount: field(data, "amount")?,
                sidechain_address: field(data, "sidechainAddress")?,
            }),
            ("referrals", "reserve" | "unreserve") => Ok(Self::Referral {
                from: field(data, "from")?,
                to: field(data, "to")?,
                amount: field(data, "amount")?,
            }),
            _ if is_reward_claim(module, method) => {
                let items = data.as_array().ok_or(NormalizeError::ExpectedList)?;
                let items = items
                    .iter()
                    .map(|item| {
                        Ok(RewardItem {
                            asset_id: field(item, "assetId")?,
                            amount: field(item, "amount")?,
                        })
                    })
                    .collect::<Result<Vec<_>, NormalizeError>>()?;
                Ok(Self::RewardClaim { items })
            }
            ("utility", "batchAll") => {
                let calls = data.as_array().ok_or(NormalizeError::ExpectedList)?;
                Ok(Self::Batch {
                    calls: calls.clone(),
                })
            }
            _ => Ok(Self::Unrecognized),
        }
    }
}

/// The four claim signatures that expand into one row per rewarded
/// asset.
pub fn is_reward_claim(module: &str, method: &str) -> bool {
    matches!(
        (module, method),
        ("pswapDistribution", "claimIncentive")
            | ("rewards", "claim")
            | ("vestedRewards", "claimRewards")
            | ("vestedRewards", "claimCrowdloanRewards")
    )
}

/// Extract a string (or stringified number) payload field.
fn field(data: &Value, key: &'static str) -> Result<String, NormalizeError> {
    match data.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(NormalizeError::MissingField(key)),
    }
}
