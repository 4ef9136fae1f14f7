//! Labels and fixed strings shared across the report pipeline.

/// Scan-tool label stamped on rows sourced from the SubQuery index.
pub const SCAN_TOOL_SUBQUERY: &str = "SubQuery";

/// Scan-tool label stamped on rows sourced from Etherscan.
pub const SCAN_TOOL_ETHERSCAN: &str = "EtherScan";

pub const NETWORK_SORA: &str = "SORA Main Net";
pub const NETWORK_ETH: &str = "ETH Main Net";

/// Chain-native fee asset on SORA.
pub const XOR_TICKER: &str = "XOR";

/// Fee unit reported for Ethereum transfers.
pub const GWEI_TICKER: &str = "Gwei";

/// Transaction type stamped on rows whose extrinsic did not execute.
pub const FAILED_TYPE: &str = "failed";

/// UTC date rendering used in the "Date and Time (UTC)" column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local-time stamp embedded in report file names.
pub const REPORT_STAMP_FORMAT: &str = "%H:%M %d.%m.%y";

/// Upper bound block passed to Etherscan listings.
pub const ETH_END_BLOCK: u64 = 99_999_999;
