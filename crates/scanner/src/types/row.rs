use chrono::DateTime;

use crate::consts::DATE_FORMAT;
use crate::types::HistoryElement;

/// Column headers of the report, in emission order. The writer prepends
/// an unnamed positional index column.
pub const HEADERS: [&str; 17] = [
    "Scan Tool",
    "Data Source",
    "Time Stamp",
    "Date and Time (UTC)",
    "Block height",
    "Transaction hash",
    "Line Number",
    "Transaction Type",
    "Token amount",
    "Token ticker",
    "Sender or Receiver",
    "Sending wallet",
    "Receiving side address",
    "Network fee amount",
    "Network fee token ticker",
    "Liquidity Provider Fee",
    "Liquidity Provider Fee token ticker",
];

/// One output line of the report. Compound events (swaps, pool
/// operations, reward batches) emit several rows distinguished by `line`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub scan: String,
    pub network: String,
    pub timestamp: u64,
    pub date: String,
    pub height: String,
    pub tx_hash: String,
    pub line: u32,
    pub kind: String,
    pub amount: String,
    pub ticker: String,
    pub send_or_receive: String,
    pub sender: String,
    pub receiver: String,
    pub network_fee: String,
    pub fee_ticker: String,
    pub lp_fee: String,
    pub lp_fee_ticker: String,
}

impl Row {
    /// Draft row shared by every leg of an event: envelope fields filled
    /// in, payload fields left blank. The first leg keeps the network
    /// fee stamped here.
    pub fn baseline(event: &HistoryElement, scan: &str, network: &str, fee_ticker: &str) -> Self {
        Self {
            scan: scan.to_string(),
            network: network.to_string(),
            timestamp: event.timestamp,
            date: format_utc_date(event.timestamp),
            height: event.block_height.clone(),
            tx_hash: event.id.clone(),
            line: 1,
            kind: event.method.clone(),
            network_fee: event.network_fee.clone(),
            fee_ticker: fee_ticker.to_string(),
            ..Self::default()
        }
    }

    /// Derive the second leg of a compound event: line 2, fee columns
    /// blanked (the fee belongs to the first leg only).
    pub fn second_leg(&self) -> Self {
        let mut row = self.clone();
        row.line = 2;
        row.network_fee.clear();
        row.fee_ticker.clear();
        row
    }

    /// Flatten into the CSV record shape, index column first.
    pub fn record(&self, index: usize) -> Vec<String> {
        vec![
            index.to_string(),
            self.scan.clone(),
            self.network.clone(),
            self.timestamp.to_string(),
            self.date.clone(),
            self.height.clone(),
            self.tx_hash.clone(),
            self.line.to_string(),
            self.kind.clone(),
            self.amount.clone(),
            self.ticker.clone(),
            self.send_or_receive.clone(),
            self.sender.clone(),
            self.receiver.clone(),
            self.network_fee.clone(),
            self.fee_ticker.clone(),
            self.lp_fee.clone(),
            self.lp_fee_ticker.clone(),
        ]
    }
}

/// Render a unix timestamp as the report's UTC date column.
pub fn format_utc_date(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
