//! Per-account aggregation of perp positions and spot balances
//!
//! Pure functions over the raw clearinghouse responses and the shared
//! reference data. Nothing here performs I/O or keeps state between accounts.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::reference::ReferenceData;
use crate::types::{
    AccountIdentity, ClearinghouseState, PositionData, RawSpotBalance, SpotClearinghouseState,
};

/// Parse an exchange decimal string, naming the field on failure.
///
/// `NaN` and infinities are rejected: exchange amounts are always finite.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::InvalidDecimal {
            field,
            value: value.to_string(),
        })
}

/// One open perp position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerpPosition {
    pub coin: String,
    pub entry_price: f64,
    pub position_value: f64,
    pub unrealized_pnl: f64,
    /// Cost basis implied by current value minus gains
    pub invested_value: f64,
    /// `None` when the exchange reports no liquidation price
    pub liquidation_price: Option<f64>,
    pub all_time_funding: f64,
}

impl PerpPosition {
    pub fn from_raw(raw: &PositionData) -> Result<Self> {
        let position_value = parse_decimal("positionValue", &raw.position_value)?;
        let unrealized_pnl = parse_decimal("unrealizedPnl", &raw.unrealized_pnl)?;
        let liquidation_price = raw
            .liquidation_px
            .as_deref()
            .map(|px| parse_decimal("liquidationPx", px))
            .transpose()?;

        Ok(Self {
            coin: raw.coin.clone(),
            entry_price: parse_decimal("entryPx", &raw.entry_px)?,
            position_value,
            unrealized_pnl,
            invested_value: position_value - unrealized_pnl,
            liquidation_price,
            all_time_funding: parse_decimal("cumFunding.allTime", &raw.cum_funding.all_time)?,
        })
    }
}

/// Account-level metrics derived from a non-empty position set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerpMetrics {
    pub total_unrealized_pnl: f64,
    pub total_funding: f64,
    pub leverage: f64,
    pub initial_balance: f64,
    /// NaN when the initial balance is not a positive finite number
    pub pnl_percent: f64,
}

impl PerpMetrics {
    /// Derive metrics from account equity, notional exposure and positions.
    ///
    /// Returns `None` for an empty position set.
    pub fn compute(
        account_value: f64,
        total_notional: f64,
        positions: &[PerpPosition],
    ) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }

        let total_unrealized_pnl: f64 = positions.iter().map(|p| p.unrealized_pnl).sum();
        let total_funding: f64 = positions.iter().map(|p| p.all_time_funding).sum();
        let initial_balance = account_value - total_unrealized_pnl;

        Some(Self {
            total_unrealized_pnl,
            total_funding,
            leverage: total_notional / account_value,
            initial_balance,
            pnl_percent: pnl_percent(account_value, initial_balance),
        })
    }
}

/// Return on the initial balance, in percent.
///
/// A zero, negative or non-finite initial balance has no meaningful return
/// and yields NaN.
pub fn pnl_percent(account_value: f64, initial_balance: f64) -> f64 {
    if initial_balance.is_finite() && initial_balance > 0.0 {
        (account_value - initial_balance) / initial_balance * 100.0
    } else {
        f64::NAN
    }
}

/// Perp account summary with its open positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerpAccountSummary {
    pub account_value: f64,
    pub total_margin_used: f64,
    pub total_notional: f64,
    pub positions: Vec<PerpPosition>,
    /// `None` exactly when `positions` is empty
    pub metrics: Option<PerpMetrics>,
}

impl PerpAccountSummary {
    pub fn has_positions(&self) -> bool {
        !self.positions.is_empty()
    }
}

/// Summarize a perp clearinghouse state
pub fn aggregate_perps(state: &ClearinghouseState) -> Result<PerpAccountSummary> {
    let summary = &state.cross_margin_summary;
    let account_value = parse_decimal("accountValue", &summary.account_value)?;
    let total_margin_used = parse_decimal("totalMarginUsed", &summary.total_margin_used)?;
    let total_notional = parse_decimal("totalNtlPos", &summary.total_ntl_pos)?;

    let positions = state
        .asset_positions
        .iter()
        .map(|asset| PerpPosition::from_raw(&asset.position))
        .collect::<Result<Vec<_>>>()?;
    let metrics = PerpMetrics::compute(account_value, total_notional, &positions);

    Ok(PerpAccountSummary {
        account_value,
        total_margin_used,
        total_notional,
        positions,
        metrics,
    })
}

/// Spot holding valued at the current mid price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotHolding {
    pub coin: String,
    pub total: f64,
    pub entry_notional: Option<f64>,
    pub price: f64,
    pub usd_value: f64,
}

impl SpotHolding {
    fn from_raw(raw: &RawSpotBalance, reference: &ReferenceData) -> Result<Self> {
        let price = reference.resolve_price(raw.token)?;
        let total = parse_decimal("total", &raw.total)?;
        let entry_notional = raw
            .entry_ntl
            .as_deref()
            .map(|v| parse_decimal("entryNtl", v))
            .transpose()?;

        Ok(Self {
            coin: raw.coin.clone(),
            total,
            entry_notional,
            price,
            usd_value: total * price,
        })
    }
}

/// Value spot balances and order them by USD value, largest first.
///
/// Equal values keep the exchange's order.
pub fn aggregate_spot(
    state: &SpotClearinghouseState,
    reference: &ReferenceData,
) -> Result<Vec<SpotHolding>> {
    let mut holdings = state
        .balances
        .iter()
        .map(|balance| SpotHolding::from_raw(balance, reference))
        .collect::<Result<Vec<_>>>()?;
    holdings.sort_by(|a, b| {
        b.usd_value
            .partial_cmp(&a.usd_value)
            .unwrap_or(Ordering::Equal)
    });
    Ok(holdings)
}

/// Everything the dashboard shows for one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub label: String,
    pub perp: PerpAccountSummary,
    pub spot: Vec<SpotHolding>,
}

/// Aggregate both perp and spot state for one account
pub fn aggregate_account(
    identity: &AccountIdentity,
    perp_state: &ClearinghouseState,
    spot_state: &SpotClearinghouseState,
    reference: &ReferenceData,
) -> Result<AccountReport> {
    Ok(AccountReport {
        label: identity.label.clone(),
        perp: aggregate_perps(perp_state)?,
        spot: aggregate_spot(spot_state, reference)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::reference::tests::{mids, pair};
    use crate::types::{AssetPosition, CumFunding, MarginSummary, SpotMeta};

    pub(crate) fn raw_position(
        coin: &str,
        entry: &str,
        value: &str,
        pnl: &str,
        liq: Option<&str>,
        funding: &str,
    ) -> AssetPosition {
        AssetPosition {
            position: PositionData {
                coin: coin.to_string(),
                entry_px: entry.to_string(),
                position_value: value.to_string(),
                unrealized_pnl: pnl.to_string(),
                liquidation_px: liq.map(str::to_string),
                cum_funding: CumFunding {
                    all_time: funding.to_string(),
                },
            },
        }
    }

    pub(crate) fn perp_state(
        account_value: &str,
        margin: &str,
        notional: &str,
        positions: Vec<AssetPosition>,
    ) -> ClearinghouseState {
        ClearinghouseState {
            cross_margin_summary: MarginSummary {
                account_value: account_value.to_string(),
                total_margin_used: margin.to_string(),
                total_ntl_pos: notional.to_string(),
            },
            asset_positions: positions,
        }
    }

    pub(crate) fn balance(token: u32, coin: &str, total: &str) -> RawSpotBalance {
        RawSpotBalance {
            coin: coin.to_string(),
            token,
            total: total.to_string(),
            hold: "0".to_string(),
            entry_ntl: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_position_invested_value_and_missing_liquidation() {
        let raw = raw_position("ETH", "2000", "1000", "-50", None, "5");
        let position = PerpPosition::from_raw(&raw.position).unwrap();

        assert!(approx(position.entry_price, 2000.0));
        assert!(approx(position.invested_value, 1050.0));
        assert!(position.liquidation_price.is_none());
        assert!(approx(position.all_time_funding, 5.0));
    }

    #[test]
    fn test_position_with_liquidation_price() {
        let raw = raw_position("BTC", "60000", "6500", "500", Some("45000.5"), "-12.25");
        let position = PerpPosition::from_raw(&raw.position).unwrap();
        assert_eq!(position.liquidation_price, Some(45000.5));
        assert!(approx(position.invested_value, 6000.0));
    }

    #[test]
    fn test_position_invalid_decimal() {
        let raw = raw_position("BTC", "oops", "1", "0", None, "0");
        let err = PerpPosition::from_raw(&raw.position).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidDecimal { field: "entryPx", .. }
        ));
    }

    #[test]
    fn test_empty_positions_have_no_metrics() {
        let state = perp_state("1234.5", "0", "0", vec![]);
        let summary = aggregate_perps(&state).unwrap();

        assert!(!summary.has_positions());
        assert!(summary.metrics.is_none());
        assert!(approx(summary.account_value, 1234.5));
    }

    #[test]
    fn test_metrics_totals_and_leverage() {
        let state = perp_state(
            "1000",
            "300",
            "3000",
            vec![
                raw_position("ETH", "2000", "2000", "60", None, "1.5"),
                raw_position("BTC", "50000", "1000", "40", Some("30000"), "-0.5"),
            ],
        );
        let summary = aggregate_perps(&state).unwrap();
        let metrics = summary.metrics.unwrap();

        assert!(approx(metrics.total_unrealized_pnl, 100.0));
        assert!(approx(metrics.total_funding, 1.0));
        assert!(approx(metrics.leverage, 3.0));
        assert!(approx(metrics.initial_balance, 900.0));
        assert!((metrics.pnl_percent - 11.111_111).abs() < 1e-4);
        assert!(approx(
            metrics.pnl_percent,
            metrics.total_unrealized_pnl / metrics.initial_balance * 100.0
        ));

        for position in &summary.positions {
            assert!(approx(
                position.invested_value,
                position.position_value - position.unrealized_pnl
            ));
        }
    }

    #[test]
    fn test_pnl_percent_guard() {
        assert!(pnl_percent(100.0, 0.0).is_nan());
        assert!(pnl_percent(100.0, -50.0).is_nan());
        assert!(pnl_percent(100.0, f64::INFINITY).is_nan());
        assert!(approx(pnl_percent(1000.0, 900.0), 100.0 / 9.0));
        assert!(approx(pnl_percent(800.0, 1000.0), -20.0));
    }

    #[test]
    fn test_zero_initial_balance_surfaces_nan() {
        let state = perp_state(
            "100",
            "10",
            "500",
            vec![raw_position("SOL", "100", "500", "100", None, "0")],
        );
        let metrics = aggregate_perps(&state).unwrap().metrics.unwrap();
        assert!(approx(metrics.initial_balance, 0.0));
        assert!(metrics.pnl_percent.is_nan());
    }

    fn reference() -> ReferenceData {
        let meta = SpotMeta {
            universe: vec![pair(&[1, 0], "ETH"), pair(&[2, 0], "PURR/USDC")],
        };
        ReferenceData::from_responses(&meta, mids(&[("ETH", "3000.0"), ("PURR/USDC", "0.5")]))
            .unwrap()
    }

    #[test]
    fn test_spot_valuation() {
        let state = SpotClearinghouseState {
            balances: vec![balance(1, "ETH", "2.5")],
        };
        let holdings = aggregate_spot(&state, &reference()).unwrap();

        assert_eq!(holdings.len(), 1);
        assert!(approx(holdings[0].price, 3000.0));
        assert!(approx(holdings[0].usd_value, 7500.0));
    }

    #[test]
    fn test_spot_sorted_descending_and_stable() {
        let state = SpotClearinghouseState {
            balances: vec![
                balance(0, "USDC", "10"),
                balance(2, "PURR", "20"),
                balance(1, "ETH", "1"),
                balance(0, "USDC", "0"),
            ],
        };
        let holdings = aggregate_spot(&state, &reference()).unwrap();
        let coins: Vec<_> = holdings.iter().map(|h| h.coin.as_str()).collect();

        assert_eq!(coins, vec!["ETH", "USDC", "PURR", "USDC"]);
        // 10 USDC and 20 PURR @ 0.5 tie at 10.0; exchange order is kept
        assert!(approx(holdings[1].usd_value, holdings[2].usd_value));
        assert!(holdings.windows(2).all(|w| w[0].usd_value >= w[1].usd_value));
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        assert!(approx(parse_decimal("total", " 2.5 ").unwrap(), 2.5));
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", ""] {
            assert!(
                matches!(
                    parse_decimal("total", raw),
                    Err(DashboardError::InvalidDecimal { field: "total", .. })
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_spot_nan_mid_price_fails() {
        let meta = SpotMeta {
            universe: vec![pair(&[1, 0], "ETH"), pair(&[2, 0], "BAD")],
        };
        let reference =
            ReferenceData::from_responses(&meta, mids(&[("ETH", "3000.0"), ("BAD", "NaN")]))
                .unwrap();
        let state = SpotClearinghouseState {
            balances: vec![balance(1, "ETH", "1"), balance(2, "BAD", "1")],
        };

        let err = aggregate_spot(&state, &reference).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidDecimal { field: "midPx", .. }
        ));
    }

    #[test]
    fn test_infinite_account_value_fails() {
        let state = perp_state(
            "inf",
            "0",
            "500",
            vec![raw_position("SOL", "100", "500", "0", None, "0")],
        );
        assert!(matches!(
            aggregate_perps(&state),
            Err(DashboardError::InvalidDecimal { field: "accountValue", .. })
        ));
    }

    #[test]
    fn test_spot_zero_values_keep_order() {
        let state = SpotClearinghouseState {
            balances: vec![
                balance(1, "ETH", "0"),
                balance(1, "ETH-NEG", "-0"),
                balance(0, "USDC", "0"),
            ],
        };
        let holdings = aggregate_spot(&state, &reference()).unwrap();
        let coins: Vec<_> = holdings.iter().map(|h| h.coin.as_str()).collect();
        assert_eq!(coins, vec!["ETH", "ETH-NEG", "USDC"]);
    }

    #[test]
    fn test_zero_account_value_gives_infinite_leverage() {
        let state = perp_state(
            "0",
            "0",
            "500",
            vec![raw_position("SOL", "100", "500", "-20", None, "0")],
        );
        let metrics = aggregate_perps(&state).unwrap().metrics.unwrap();

        assert!(metrics.leverage.is_infinite());
        assert!(metrics.leverage > 0.0);
        assert!(approx(metrics.initial_balance, 20.0));
    }

    #[test]
    fn test_spot_unknown_token_fails() {
        let state = SpotClearinghouseState {
            balances: vec![balance(1, "ETH", "1"), balance(77, "NEW", "1")],
        };
        let err = aggregate_spot(&state, &reference()).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownToken(77)));
    }

    #[test]
    fn test_spot_entry_notional_kept() {
        let mut raw = balance(1, "ETH", "1");
        raw.entry_ntl = Some("2800.0".to_string());
        let state = SpotClearinghouseState { balances: vec![raw] };
        let holdings = aggregate_spot(&state, &reference()).unwrap();
        assert_eq!(holdings[0].entry_notional, Some(2800.0));
    }

    #[test]
    fn test_aggregate_account() {
        let identity = AccountIdentity::new("Main", "0x1");
        let perp = perp_state("500", "0", "0", vec![]);
        let spot = SpotClearinghouseState { balances: vec![] };

        let report = aggregate_account(&identity, &perp, &spot, &reference()).unwrap();
        assert_eq!(report.label, "Main");
        assert!(!report.perp.has_positions());
        assert!(report.spot.is_empty());
    }
}
