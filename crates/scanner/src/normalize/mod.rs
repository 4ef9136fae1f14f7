//! Normalization of raw history elements into report rows.
//!
//! One event expands into zero or more rows: plain transfers stay one
//! row, swaps and pool operations emit one row per leg, reward claims
//! emit one row per claimed asset. The network fee always lands on the
//! first emitted row only.

mod call;

pub use call::{CallKind, NormalizeError, RewardItem, is_reward_claim};

use serde_json::{Value, json};

use crate::amount::format_fixed_point;
use crate::assets::AssetLookup;
use crate::consts::{FAILED_TYPE, XOR_TICKER};
use crate::types::{HistoryElement, Row};

/// Map one history element to its report rows.
///
/// `base` is the draft row carrying the envelope fields (labels,
/// timestamp, height, hash, fee); normalization fills in the payload
/// side. Amount and ticker lookups go through `lookup`.
pub async fn normalize<L: AssetLookup>(
    event: &HistoryElement,
    wallet: &str,
    lookup: &mut L,
    base: Row,
) -> Result<Vec<Row>, NormalizeError> {
    let mut base = base;

    // A failed extrinsic is reported as a single marker row no matter
    // what it would have been.
    if let Some(execution) = &event.execution {
        if !execution.success {
            base.kind = FAILED_TYPE.to_string();
            return Ok(vec![base]);
        }
    }

    let kind = match CallKind::classify(event)? {
        CallKind::Batch { calls } => match calls.iter().find_map(expand_embedded) {
            Some((module, method, data)) => {
                // The report shows the embedded call, not the wrapper.
                base.kind = method.clone();
                CallKind::from_parts(&module, &method, &data)?
            }
            None => CallKind::Unrecognized,
        },
        kind => kind,
    };

    let rows = match kind {
        CallKind::Transfer {
            from,
            to,
            amount,
            asset_id,
        } => {
            let mut row = base;
            row.amount = amount;
            row.ticker = lookup.ticker(&asset_id).await;
            row.send_or_receive = if from == wallet { "S" } else { "R" }.to_string();
            row.sender = from;
            row.receiver = to;
            vec![row]
        }

        CallKind::Register { asset_id } => {
            let mut row = base;
            // The payload carries no block hash, so the supply is read
            // at the latest block.
            row.amount = lookup.total_supply(&asset_id, None).await;
            row.ticker = lookup.ticker(&asset_id).await;
            row.send_or_receive = "R".to_string();
            row.receiver = wallet.to_string();
            vec![row]
        }

        CallKind::Swap {
            base_asset_id,
            base_amount,
            target_asset_id,
            target_amount,
            lp_fee,
        } => {
            let mut leg_out = base.clone();
            leg_out.lp_fee = lp_fee;
            leg_out.lp_fee_ticker = XOR_TICKER.to_string();
            leg_out.amount = base_amount;
            leg_out.ticker = lookup.ticker(&base_asset_id).await;
            leg_out.send_or_receive = "S".to_string();
            leg_out.sender = wallet.to_string();

            let mut leg_in = base.second_leg();
            leg_in.amount = target_amount;
            leg_in.ticker = lookup.ticker(&target_asset_id).await;
            leg_in.send_or_receive = "R".to_string();
            leg_in.receiver = wallet.to_string();

            vec![leg_out, leg_in]
        }

        CallKind::Liquidity {
            withdraw,
            base_asset_id,
            base_amount,
            target_asset_id,
            target_amount,
        } => {
            // Direction is decided once and applies to both legs.
            let mut base = base;
            if withdraw {
                base.send_or_receive = "R".to_string();
                base.receiver = wallet.to_string();
            } else {
                base.send_or_receive = "S".to_string();
                base.sender = wallet.to_string();
            }

            let mut leg_base = base.clone();
            leg_base.amount = base_amount;
            leg_base.ticker = lookup.ticker(&base_asset_id).await;

            let mut leg_target = base.second_leg();
            leg_target.amount = target_amount;
            leg_target.ticker = lookup.ticker(&target_asset_id).await;

            vec![leg_base, leg_target]
        }

        CallKind::BridgeOut {
            asset_id,
            amount,
            sidechain_address,
        } => {
            let mut row = base;
            row.amount = amount;
            row.ticker = lookup.ticker(&asset_id).await;
            row.send_or_receive = "S".to_string();
            row.sender = wallet.to_string();
            row.receiver = sidechain_address;
            vec![row]
        }

        CallKind::Referral { from, to, amount } => {
            let mut row = base;
            row.amount = amount;
            row.ticker = XOR_TICKER.to_string();
            // Only the matching side's address is reported.
            if from == wallet {
                row.send_or_receive = "S".to_string();
                row.sender = from;
            } else {
                row.send_or_receive = "R".to_string();
                row.receiver = to;
            }
            vec![row]
        }

        CallKind::RewardClaim { items } => {
            let fee = base.network_fee.clone();
            let fee_ticker = base.fee_ticker.clone();

            let mut template = base;
            template.network_fee.clear();
            template.fee_ticker.clear();
            template.send_or_receive = "R".to_string();
            template.receiver = wallet.to_string();

            let mut rows = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mut row = template.clone();
                row.line = index as u32 + 1;
                let precision = lookup.precision(&item.asset_id).await;
                row.amount = format_fixed_point(&item.amount, precision as i32)?;
                row.ticker = lookup.ticker(&item.asset_id).await;
                rows.push(row);
            }

            // The event's fee belongs to the first produced row only.
            if let Some(first) = rows.first_mut() {
                first.network_fee = fee;
                first.fee_ticker = fee_ticker;
            }
            rows
        }

        // Pass-through policy: events this scanner does not understand
        // still show up as their baseline row instead of vanishing.
        CallKind::Batch { .. } | CallKind::Unrecognized => vec![base],
    };

    Ok(rows)
}

/// Match one embedded batch item against the call signatures a batch can
/// stand in for, and flatten its nested arguments into the payload shape
/// of the direct call. Returns the embedded (module, method) plus the
/// flattened payload.
fn expand_embedded(call: &Value) -> Option<(String, String, Value)> {
    let module = call.get("module")?.as_str()?;
    let method = call.get("method")?.as_str()?;

    if module.eq_ignore_ascii_case("poolxyk") && method == "depositLiquidity" {
        let args = call.get("data")?.get("args")?;
        let flat = json!({
            "baseAssetAmount": args.get("input_a_desired")?,
            "baseAssetId": args.get("input_asset_a")?,
            "targetAssetAmount": args.get("input_b_desired")?,
            "targetAssetId": args.get("input_asset_b")?,
        });
        return Some((module.to_string(), method.to_string(), flat));
    }

    if is_reward_claim(module, method) {
        // Claim batches carry the per-asset item list directly.
        let data = call.get("data")?;
        if data.is_array() {
            return Some((module.to_string(), method.to_string(), data.clone()));
        }
    }

    None
}
