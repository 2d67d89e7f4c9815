//! Exchange reference data shared by every account pass
//!
//! Built once per page load from the spot universe and the mid price table,
//! then passed by reference into aggregation. Never mutated afterwards.

use std::collections::HashMap;

use crate::client::InfoSource;
use crate::error::{DashboardError, Result};
use crate::types::{AllMids, SpotMeta};

/// Token index reserved for the USD quote asset (USDC)
pub const QUOTE_TOKEN_INDEX: u32 = 0;

/// Symbol the quote asset is priced under
pub const QUOTE_SYMBOL: &str = "@0";

/// Fixed mid price of the quote asset
pub const QUOTE_PRICE: &str = "1.00";

/// Token index -> spot symbol
pub type TokenIndexMap = HashMap<u32, String>;

/// Spot symbol -> mid price decimal string
pub type SpotPriceMap = HashMap<String, String>;

/// Read-only token and price lookups for one page load
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    tokens: TokenIndexMap,
    prices: SpotPriceMap,
}

impl ReferenceData {
    /// Fetch spot metadata, then mid prices, and build the lookup maps
    pub async fn load<S: InfoSource>(source: &S) -> Result<Self> {
        let meta = source.spot_meta_and_asset_ctxs().await?;
        let mids = source.all_mids().await?;
        Self::from_responses(meta.meta(), mids)
    }

    /// Build from already-fetched responses.
    ///
    /// Each universe pair maps its base token index (first entry of `tokens`)
    /// to the pair name. The quote asset override is applied afterwards and
    /// wins over anything the universe says about index 0.
    pub fn from_responses(meta: &SpotMeta, mids: AllMids) -> Result<Self> {
        let mut tokens = TokenIndexMap::with_capacity(meta.universe.len() + 1);
        for pair in &meta.universe {
            let base = pair.tokens.first().ok_or_else(|| {
                DashboardError::MalformedMetadata(format!(
                    "universe entry {} has no token indices",
                    pair.name
                ))
            })?;
            tokens.insert(*base, pair.name.clone());
        }

        let mut data = Self {
            tokens,
            prices: mids,
        };
        data.apply_quote_override();
        Ok(data)
    }

    fn apply_quote_override(&mut self) {
        self.tokens
            .insert(QUOTE_TOKEN_INDEX, QUOTE_SYMBOL.to_string());
        self.prices
            .insert(QUOTE_SYMBOL.to_string(), QUOTE_PRICE.to_string());
    }

    /// Spot symbol for a token index
    pub fn resolve_symbol(&self, token: u32) -> Result<&str> {
        self.tokens
            .get(&token)
            .map(String::as_str)
            .ok_or(DashboardError::UnknownToken(token))
    }

    /// Current mid price for a token index
    pub fn resolve_price(&self, token: u32) -> Result<f64> {
        let symbol = self.resolve_symbol(token)?;
        let raw = self
            .prices
            .get(symbol)
            .ok_or_else(|| DashboardError::UnknownSymbol(symbol.to_string()))?;
        crate::portfolio::parse_decimal("midPx", raw)
    }

    #[cfg(test)]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    #[cfg(test)]
    pub fn price_count(&self) -> usize {
        self.prices.len()
    }
}
