//! SubQuery GraphQL client for the SORA history-element index.

use serde::Deserialize;
use serde_json::{Value, json};

use super::SourceError;
use crate::types::HistoryElement;

/// The history-element listing, cursor-paginated, newest first.
const HISTORY_QUERY: &str = r#"
query HistoryElements(
  $after: Cursor = ""
  $orderBy: [HistoryElementsOrderBy!] = TIMESTAMP_DESC
  $filter: HistoryElementFilter
) {
  historyElements(after: $after, orderBy: $orderBy, filter: $filter) {
    edges {
      node {
        id
        timestamp
        blockHash
        blockHeight
        module
        method
        address
        networkFee
        execution
        data
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// One page of history elements plus the cursor for the next request.
#[derive(Debug)]
pub struct Page {
    pub elements: Vec<HistoryElement>,
    pub end_cursor: Option<String>,
    pub has_next: bool,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<DataSection>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataSection {
    history_elements: HistoryElements,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryElements {
    edges: Vec<Edge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: HistoryElement,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

pub struct SubQueryClient {
    http: reqwest::Client,
    url: String,
}

impl SubQueryClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    /// Fetch the page following `after` (empty cursor for the first
    /// page) of all history elements matching `filter`.
    pub async fn fetch_page(&self, filter: &Value, after: &str) -> Result<Page, SourceError> {
        let body = json!({
            "query": HISTORY_QUERY,
            "variables": { "filter": filter, "after": after },
        });

        let response: GraphQlResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_page(response)
    }
}

fn parse_page(response: GraphQlResponse) -> Result<Page, SourceError> {
    if let Some(errors) = response.errors {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(SourceError::GraphQl(message));
    }

    let data = response
        .data
        .ok_or_else(|| SourceError::BadResponse("missing data section".to_string()))?;

    let history = data.history_elements;
    Ok(Page {
        elements: history.edges.into_iter().map(|edge| edge.node).collect(),
        end_cursor: history.page_info.end_cursor,
        has_next: history.page_info.has_next_page,
    })
}

/// Server-side filter limiting the listing to the recognized call set
/// touching `address` above `from_height`. Batches are only interesting
/// when they contain a pool or claim call, which the containment clauses
/// express.
pub fn history_filter(address: &str, from_height: u64) -> Value {
    json!({
        "and": [
            {"blockHeight": {"greaterThan": from_height}},
            {"or": [
                {"module": {"equalTo": "assets"}, "method": {"equalTo": "transfer"}},
                {"module": {"equalTo": "liquidityProxy"}, "method": {"equalTo": "swap"}},
                {"module": {"equalTo": "liquidityProxy"}, "method": {"equalTo": "swapTransfer"}},

                {"module": {"equalTo": "utility"}, "method": {"equalTo": "batchAll"},
                 "data": {"contains": [
                     {"module": "poolXYK", "method": "initializePool"},
                     {"module": "poolXYK", "method": "depositLiquidity"}
                 ]}},

                {"module": {"includesInsensitive": "poolXYK"},
                 "method": {"equalTo": "depositLiquidity"}},
                {"module": {"includesInsensitive": "poolXYK"},
                 "method": {"equalTo": "withdrawLiquidity"}},

                {"module": {"equalTo": "ethBridge"}, "method": {"equalTo": "transferToSidechain"}},

                {"module": {"equalTo": "assets"}, "method": {"equalTo": "register"}},

                {"module": {"equalTo": "referrals"}, "method": {"equalTo": "setReferrer"}},
                {"module": {"equalTo": "referrals"}, "method": {"equalTo": "reserve"}},
                {"module": {"equalTo": "referrals"}, "method": {"equalTo": "unreserve"}},

                {"or": [
                    {"module": {"equalTo": "pswapDistribution"}, "method": {"equalTo": "claimIncentive"}},
                    {"module": {"equalTo": "rewards"}, "method": {"equalTo": "claim"}},
                    {"module": {"equalTo": "vestedRewards"}, "method": {"equalTo": "claimRewards"}},
                    {"module": {"equalTo": "vestedRewards"}, "method": {"equalTo": "claimCrowdloanRewards"}},
                    {"module": {"equalTo": "utility"}, "method": {"equalTo": "batchAll"}, "or": [
                        {"data": {"contains": [{"module": "pswapDistribution", "method": "claimIncentive"}]}},
                        {"data": {"contains": [{"module": "rewards", "method": "claim"}]}},
                        {"data": {"contains": [{"module": "vestedRewards", "method": "claimRewards"}]}},
                        {"data": {"contains": [{"module": "vestedRewards", "method": "claimCrowdloanRewards"}]}}
                    ]}
                ]}
            ]},
            {"or": [
                {"address": {"equalTo": address}},
                {"data": {"contains": {"to": address}}}
            ]}
        ]
    })
}
