//! Scan orchestration. One session owns the wallet plus the per-chain
//! collaborators (event source, asset registry) and produces the rows
//! for each network; the chains share nothing and run concurrently.

use config::ScanConfig;

use crate::assets::AssetRegistry;
use crate::consts::{NETWORK_SORA, SCAN_TOOL_SUBQUERY, XOR_TICKER};
use crate::normalize::normalize;
use crate::sources::SourceError;
use crate::sources::etherscan::{self, EtherscanClient};
use crate::sources::subquery::{SubQueryClient, history_filter};
use crate::types::Row;

pub struct ScanSession {
    config: ScanConfig,
    wallet: String,
    eth_wallet: Option<String>,
    from_height: u64,
}

impl ScanSession {
    pub fn new(
        config: ScanConfig,
        wallet: &str,
        eth_wallet: Option<String>,
        from_height: u64,
    ) -> Self {
        Self {
            config,
            wallet: wallet.to_string(),
            eth_wallet,
            from_height,
        }
    }

    /// Walk the SubQuery index page by page and normalize every history
    /// element. Pagination is strictly sequential: the cursor for the
    /// next page arrives inside the current page's response.
    pub async fn run_sora(&self) -> Result<Vec<Row>, SourceError> {
        let mut registry = AssetRegistry::connect(self.config.sora.rpc_endpoints.clone()).await;
        let client = SubQueryClient::new(&self.config.sora.subquery_url);
        let filter = history_filter(&self.wallet, self.from_height);

        let mut rows = Vec::new();
        let mut after = String::new();
        let mut pages = 0u32;

        loop {
            let page = client.fetch_page(&filter, &after).await?;
            pages += 1;
            tracing::debug!(page = pages, events = page.elements.len(), "fetched history page");

            for event in &page.elements {
                let base = Row::baseline(event, SCAN_TOOL_SUBQUERY, NETWORK_SORA, XOR_TICKER);
                match normalize(event, &self.wallet, &mut registry, base).await {
                    Ok(mut event_rows) => rows.append(&mut event_rows),
                    Err(error) => {
                        // One bad record must not sink a multi-page scan.
                        tracing::warn!(id = %event.id, error = %error, "skipping malformed event");
                    }
                }
            }

            match (page.has_next, page.end_cursor) {
                (true, Some(cursor)) => after = cursor,
                _ => break,
            }
        }

        tracing::info!(rows = rows.len(), pages, "sora scan finished");
        Ok(rows)
    }

    /// Fetch the wallet's ERC-20 transfer listing and map each entry to
    /// one row. Skipped (empty result) when no Ethereum address or API
    /// key is configured.
    pub async fn run_eth(&self) -> Result<Vec<Row>, SourceError> {
        let Some(eth_wallet) = &self.eth_wallet else {
            tracing::info!("no ethereum address given, skipping the ethereum scan");
            return Ok(vec![]);
        };
        let Some(api_key) = &self.config.eth.api_key else {
            tracing::warn!("no etherscan api key configured, skipping the ethereum scan");
            return Ok(vec![]);
        };

        let client = EtherscanClient::new(&self.config.eth.api_url, api_key);
        let transfers = client.token_transfers(eth_wallet, self.from_height).await?;
        let rows: Vec<Row> = transfers
            .iter()
            .map(|transfer| etherscan::transfer_row(transfer, eth_wallet))
            .collect();

        tracing::info!(rows = rows.len(), "ethereum scan finished");
        Ok(rows)
    }
}
