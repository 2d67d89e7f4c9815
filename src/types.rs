//! Wire types for the Hyperliquid info API
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! responses is ignored by serde. Numeric values arrive as decimal strings and
//! are parsed at aggregation time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `{"type": "spotMetaAndAssetCtxs"}` response: `[meta, assetCtxs]`
#[derive(Debug, Clone, Deserialize)]
pub struct SpotMetaAndAssetCtxs(pub SpotMeta, pub Vec<serde_json::Value>);

impl SpotMetaAndAssetCtxs {
    pub fn meta(&self) -> &SpotMeta {
        &self.0
    }
}

/// Spot universe metadata
#[derive(Debug, Clone, Deserialize)]
pub struct SpotMeta {
    pub universe: Vec<SpotPair>,
}

/// One spot pair in the universe
#[derive(Debug, Clone, Deserialize)]
pub struct SpotPair {
    /// Token indices, base token first
    pub tokens: Vec<u32>,
    /// Pair name used as the key in `allMids` (e.g. "PURR/USDC" or "@107")
    pub name: String,
}

/// `{"type": "allMids"}` response: symbol -> mid price decimal string
pub type AllMids = HashMap<String, String>;

/// `{"type": "clearinghouseState"}` response (perp account)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearinghouseState {
    pub cross_margin_summary: MarginSummary,
    #[serde(default)]
    pub asset_positions: Vec<AssetPosition>,
}

/// Cross margin summary
#[allow(clippy::struct_field_names)] // Matches Hyperliquid API schema
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginSummary {
    pub account_value: String,
    pub total_margin_used: String,
    pub total_ntl_pos: String,
}

/// Wrapper around one open perp position
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPosition {
    pub position: PositionData,
}

/// Open perp position as reported by the clearinghouse
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
    pub coin: String,
    pub entry_px: String,
    pub position_value: String,
    pub unrealized_pnl: String,
    /// Null when the position cannot be liquidated
    #[serde(default)]
    pub liquidation_px: Option<String>,
    pub cum_funding: CumFunding,
}

/// Cumulative funding for a position
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumFunding {
    pub all_time: String,
}

/// `{"type": "spotClearinghouseState"}` response
#[derive(Debug, Clone, Deserialize)]
pub struct SpotClearinghouseState {
    #[serde(default)]
    pub balances: Vec<RawSpotBalance>,
}

/// One spot token balance
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpotBalance {
    #[serde(default)]
    pub coin: String,
    pub token: u32,
    pub total: String,
    pub hold: String,
    #[serde(default)]
    pub entry_ntl: Option<String>,
}

/// Body of a `POST /info` request
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest {
    SpotMetaAndAssetCtxs,
    AllMids,
    ClearinghouseState { user: String },
    SpotClearinghouseState { user: String },
}

/// A configured account: display label plus address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub label: String,
    pub address: String,
}

impl AccountIdentity {
    pub fn new(label: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            address: address.into(),
        }
    }
}
