use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Execution outcome attached to an indexed extrinsic. Absent means the
/// call succeeded.
#[derive(Debug, Clone, Deserialize)]
pub struct Execution {
    pub success: bool,
}

/// One history element as served by the SubQuery index: the envelope
/// fields every event carries plus a module/method specific payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryElement {
    pub id: String,

    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub timestamp: u64,

    #[serde(default)]
    pub block_hash: Option<String>,

    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub block_height: String,

    pub module: String,
    pub method: String,

    /// Signing address as indexed; not every element carries one.
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "string_from_number_or_string")]
    pub network_fee: String,

    #[serde(default)]
    pub execution: Option<Execution>,

    /// Module/method specific payload; its shape is resolved during
    /// normalization.
    #[serde(default)]
    pub data: Value,
}

/// Accept both the numeric and string renderings indexers use for
/// big-integer fields.
fn string_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got: {}",
            other
        ))),
    }
}

fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid integer: {}", n))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid integer '{}': {}", s, e))),
        other => Err(serde::de::Error::custom(format!(
            "expected unsigned integer, got: {}",
            other
        ))),
    }
}
