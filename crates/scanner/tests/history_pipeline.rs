//! End-to-end pipeline check: raw history elements in, CSV report out.

use std::collections::HashMap;

use serde_json::json;

use sora_wallet_scan::assets::AssetLookup;
use sora_wallet_scan::consts::{NETWORK_SORA, SCAN_TOOL_SUBQUERY, XOR_TICKER};
use sora_wallet_scan::normalize::normalize;
use sora_wallet_scan::report;
use sora_wallet_scan::types::{HistoryElement, Row, TokenInfo};

const WALLET: &str = "cnVkoGs3rEMqLqY27c2nfVXJRGdzNJk2ns78DcqtppaSRe8qm";
const XOR_ID: &str = "0x0200000000000000000000000000000000000000000000000000000000000000";
const PSWAP_ID: &str = "0x0200050000000000000000000000000000000000000000000000000000000000";

struct StaticAssets(HashMap<String, TokenInfo>);

impl StaticAssets {
    fn new() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(XOR_ID.to_string(), TokenInfo::new("SORA", "XOR", 18));
        tokens.insert(PSWAP_ID.to_string(), TokenInfo::new("Polkaswap", "PSWAP", 18));
        Self(tokens)
    }
}

impl AssetLookup for StaticAssets {
    async fn ticker(&mut self, asset_id: &str) -> String {
        self.0
            .get(asset_id)
            .map(|t| t.symbol.clone())
            .unwrap_or_else(|| asset_id.to_string())
    }

    async fn precision(&mut self, asset_id: &str) -> u32 {
        self.0.get(asset_id).map(|t| t.precision).unwrap_or(0)
    }

    async fn total_supply(&mut self, _asset_id: &str, _at: Option<&str>) -> String {
        "350000.7".to_string()
    }
}

/// A page of history as the SubQuery index would serve it: one incoming
/// transfer, one swap, one failed call, one reward claim.
fn history_page() -> Vec<HistoryElement> {
    let nodes = vec![
        json!({
            "id": "0xaaa",
            "timestamp": 1637548358,
            "blockHeight": "5000000",
            "module": "assets",
            "method": "transfer",
            "networkFee": "700000000000000",
            "execution": {"success": true},
            "data": {
                "from": "cnTQ1kbv7PBNNQrEb1tZpmK7o1TaFjshqkM9RJXbpJoo4Nc1w",
                "to": WALLET,
                "amount": "250",
                "assetId": XOR_ID,
            }
        }),
        json!({
            "id": "0xbbb",
            "timestamp": 1637548300,
            "blockHeight": "4999990",
            "module": "liquidityProxy",
            "method": "swap",
            "networkFee": "700000000000000",
            "data": {
                "baseAssetId": XOR_ID,
                "baseAssetAmount": "10",
                "targetAssetId": PSWAP_ID,
                "targetAssetAmount": "400",
                "liquidityProviderFee": "0.03",
            }
        }),
        json!({
            "id": "0xccc",
            "timestamp": 1637548200,
            "blockHeight": "4999900",
            "module": "assets",
            "method": "transfer",
            "networkFee": "700000000000000",
            "execution": {"success": false},
            "data": {}
        }),
        json!({
            "id": "0xddd",
            "timestamp": 1637548100,
            "blockHeight": "4999800",
            "module": "pswapDistribution",
            "method": "claimIncentive",
            "networkFee": "700000000000000",
            "data": [
                {"assetId": PSWAP_ID, "amount": "4000000000000000000"},
                {"assetId": XOR_ID, "amount": "25000000000000000"},
            ]
        }),
    ];

    nodes
        .into_iter()
        .map(|node| serde_json::from_value(node).unwrap())
        .collect()
}

async fn normalize_page(elements: &[HistoryElement]) -> Vec<Row> {
    let mut lookup = StaticAssets::new();
    let mut rows = Vec::new();
    for event in elements {
        let base = Row::baseline(event, SCAN_TOOL_SUBQUERY, NETWORK_SORA, XOR_TICKER);
        rows.extend(normalize(event, WALLET, &mut lookup, base).await.unwrap());
    }
    rows
}

#[tokio::test]
async fn test_page_normalizes_to_expected_rows() {
    let rows = normalize_page(&history_page()).await;

    // 1 transfer + 2 swap legs + 1 failed + 2 claim items
    assert_eq!(rows.len(), 6);

    assert_eq!(rows[0].kind, "transfer");
    assert_eq!(rows[0].send_or_receive, "R");

    assert_eq!(rows[1].kind, "swap");
    assert_eq!(rows[1].line, 1);
    assert_eq!(rows[2].line, 2);
    assert_eq!(rows[2].ticker, "PSWAP");

    assert_eq!(rows[3].kind, "failed");

    assert_eq!(rows[4].kind, "claimIncentive");
    assert_eq!(rows[4].amount, "4.000000000000000000");
    assert_eq!(rows[5].amount, "0.025000000000000000");
    assert_eq!(rows[4].network_fee, "700000000000000");
    assert_eq!(rows[5].network_fee, "");
}

#[tokio::test]
async fn test_page_renders_as_csv_report() {
    let rows = normalize_page(&history_page()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = report::report_path(dir.path(), "SORA", WALLET, 0, &rows);
    report::write_report(&path, &rows).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    // header + 6 rows
    assert_eq!(lines.len(), 7);
    assert!(lines[0].contains("Transaction hash"));
    assert!(lines[0].contains("Liquidity Provider Fee token ticker"));
    assert!(lines[1].contains("0xaaa"));
    assert!(lines[1].contains("2021-11-22 02:32:38"));

    // the newest row's height lands in the file name
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with("(0:5000000].csv"));
}
