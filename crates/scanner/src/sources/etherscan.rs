//! Etherscan-compatible client for the wallet's ERC-20 transfer listing.

use serde::Deserialize;
use serde_json::Value;

use super::SourceError;
use crate::amount::format_fixed_point;
use crate::consts::{ETH_END_BLOCK, GWEI_TICKER, NETWORK_ETH, SCAN_TOOL_ETHERSCAN};
use crate::types::Row;

/// One ERC-20 transfer as listed by `account/tokentx`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub time_stamp: String,
    pub block_number: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub token_symbol: String,
    pub token_decimal: String,
    pub gas: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    message: String,
    result: Value,
}

pub struct EtherscanClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// List the wallet's ERC-20 transfers above `start_block`, newest
    /// first. An empty listing is an empty vector, not an error.
    pub async fn token_transfers(
        &self,
        address: &str,
        start_block: u64,
    ) -> Result<Vec<TokenTransfer>, SourceError> {
        let response: ApiResponse = self
            .http
            .get(&self.url)
            .query(&[
                ("module", "account"),
                ("action", "tokentx"),
                ("address", address),
                ("startblock", &start_block.to_string()),
                ("endblock", &ETH_END_BLOCK.to_string()),
                ("sort", "desc"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "1" {
            // Etherscan reports both of these through the error status.
            if response.message.contains("No transactions found")
                || result_text(&response.result).contains("Result window is too large")
            {
                return Ok(vec![]);
            }
            return Err(SourceError::Api(format!(
                "{}: {}",
                response.message,
                result_text(&response.result)
            )));
        }

        serde_json::from_value(response.result)
            .map_err(|e| SourceError::BadResponse(e.to_string()))
    }
}

fn result_text(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map one listed transfer to its report row.
pub fn transfer_row(transfer: &TokenTransfer, wallet: &str) -> Row {
    let timestamp = transfer.time_stamp.parse::<u64>().unwrap_or_default();
    let decimals = transfer.token_decimal.parse::<i32>().unwrap_or_default();

    let mut row = Row {
        scan: SCAN_TOOL_ETHERSCAN.to_string(),
        network: NETWORK_ETH.to_string(),
        timestamp,
        date: crate::types::format_utc_date(timestamp),
        height: transfer.block_number.clone(),
        tx_hash: transfer.hash.clone(),
        line: 1,
        kind: "transfer".to_string(),
        network_fee: transfer.gas.clone(),
        fee_ticker: GWEI_TICKER.to_string(),
        ..Row::default()
    };

    row.amount = format_fixed_point(&transfer.value, decimals)
        .unwrap_or_else(|_| transfer.value.clone());
    row.ticker = transfer.token_symbol.clone();
    row.send_or_receive = if transfer.from.eq_ignore_ascii_case(wallet) {
        "S"
    } else {
        "R"
    }
    .to_string();
    row.sender = transfer.from.clone();
    row.receiver = transfer.to.clone();

    row
}
