//! Dashboard snapshot: one page load worth of account reports
//!
//! Reference data is loaded once, then each configured account is fetched
//! and aggregated in order. The first failure aborts the whole snapshot.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::client::InfoSource;
use crate::dashboard::format;
use crate::error::Result;
use crate::portfolio::{AccountReport, PerpAccountSummary, SpotHolding, aggregate_account};
use crate::reference::ReferenceData;
use crate::types::AccountIdentity;

pub const TITLE: &str = "Hyperliquid Positions";

const PERP_COLUMNS: [&str; 7] = [
    "Coin",
    "Entry Position",
    "Position Value",
    "Unrealized Pnl",
    "Invested Value",
    "Liquidation Price",
    "All Time Funding",
];

/// Perp columns whose sign is highlighted (unrealized PnL, funding)
const PERP_SIGNED_COLUMNS: [usize; 2] = [3, 6];

const SPOT_COLUMNS: [&str; 5] = ["Coin", "Total", "Entry Notional", "Price", "USD Value"];

/// Aggregated reports for every configured account
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub accounts: Vec<AccountReport>,
}

/// Fetch and aggregate every account, sequentially and in configured order
pub async fn build_snapshot<S: InfoSource>(
    source: &S,
    accounts: &[AccountIdentity],
    generated_at: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let reference = ReferenceData::load(source).await?;

    let mut reports = Vec::with_capacity(accounts.len());
    for identity in accounts {
        let perp_state = source.user_state(&identity.address).await?;
        let spot_state = source.spot_user_state(&identity.address).await?;
        reports.push(aggregate_account(
            identity,
            &perp_state,
            &spot_state,
            &reference,
        )?);
    }

    Ok(DashboardSnapshot {
        generated_at,
        accounts: reports,
    })
}

impl DashboardSnapshot {
    /// Display-ready document consumed by the dashboard page
    pub fn display_json(&self) -> Value {
        json!({
            "title": TITLE,
            "generated_at": format!(
                "Date and Time: {} UTC",
                self.generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
            "accounts": self.accounts.iter().map(account_json).collect::<Vec<_>>(),
        })
    }
}

fn metric(label: &str, value: String) -> Value {
    json!({ "label": label, "value": value })
}

fn summary_columns(perp: &PerpAccountSummary) -> Value {
    let first = vec![
        metric("Account Value", format::usd(perp.account_value)),
        metric("Total Notional Position", format::usd(perp.total_notional)),
        metric("Total Margin Used", format::usd(perp.total_margin_used)),
    ];

    let (second, third) = match &perp.metrics {
        Some(m) => (
            vec![
                metric("Total Unrealized PnL", format::usd(m.total_unrealized_pnl)),
                metric("Total Funding", format::usd(m.total_funding)),
                metric("Leverage", format::number(m.leverage)),
            ],
            vec![
                metric("Initial Balance", format::number(m.initial_balance)),
                metric("PnL %", format::number(m.pnl_percent)),
            ],
        ),
        None => (vec![], vec![]),
    };

    json!([first, second, third])
}

fn perp_table(perp: &PerpAccountSummary) -> Value {
    if !perp.has_positions() {
        return json!({ "empty": "No Perp Positions open" });
    }

    let rows: Vec<Vec<String>> = perp
        .positions
        .iter()
        .map(|p| {
            vec![
                p.coin.clone(),
                format::plain(p.entry_price),
                format::number(p.position_value),
                format::number(p.unrealized_pnl),
                format::number(p.invested_value),
                format::optional(p.liquidation_price),
                format::number(p.all_time_funding),
            ]
        })
        .collect();

    json!({
        "title": format!("Perp Positions: {}", format::count(rows.len())),
        "columns": PERP_COLUMNS,
        "signed": PERP_SIGNED_COLUMNS,
        "rows": rows,
    })
}

fn spot_table(spot: &[SpotHolding]) -> Value {
    if spot.is_empty() {
        return json!({ "empty": "No Spot balances" });
    }

    let rows: Vec<Vec<String>> = spot
        .iter()
        .map(|h| {
            vec![
                h.coin.clone(),
                format::plain(h.total),
                format::optional(h.entry_notional),
                format::plain(h.price),
                format::usd(h.usd_value),
            ]
        })
        .collect();

    json!({
        "title": format!("Spot Positions: {}", format::count(rows.len())),
        "columns": SPOT_COLUMNS,
        "signed": [],
        "rows": rows,
    })
}

fn account_json(report: &AccountReport) -> Value {
    json!({
        "label": report.label,
        "summary": summary_columns(&report.perp),
        "perp": perp_table(&report.perp),
        "spot": spot_table(&report.spot),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;
    use crate::error::DashboardError;
    use crate::portfolio::tests::{balance, perp_state, raw_position};
    use crate::reference::tests::{mids, pair};
    use crate::types::{
        AllMids, ClearinghouseState, SpotClearinghouseState, SpotMeta, SpotMetaAndAssetCtxs,
    };

    /// In-memory exchange keyed by address, recording the call order
    struct FakeExchange {
        perps: HashMap<String, ClearinghouseState>,
        spots: HashMap<String, SpotClearinghouseState>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeExchange {
        fn new() -> Self {
            Self {
                perps: HashMap::new(),
                spots: HashMap::new(),
                calls: RefCell::new(vec![]),
            }
        }

        fn with_account(
            mut self,
            address: &str,
            perp: ClearinghouseState,
            spot: SpotClearinghouseState,
        ) -> Self {
            self.perps.insert(address.to_string(), perp);
            self.spots.insert(address.to_string(), spot);
            self
        }
    }

    impl InfoSource for FakeExchange {
        async fn spot_meta_and_asset_ctxs(&self) -> Result<SpotMetaAndAssetCtxs> {
            self.calls.borrow_mut().push("spotMeta".into());
            Ok(SpotMetaAndAssetCtxs(
                SpotMeta {
                    universe: vec![pair(&[1, 0], "ETH")],
                },
                vec![],
            ))
        }

        async fn all_mids(&self) -> Result<AllMids> {
            self.calls.borrow_mut().push("allMids".into());
            Ok(mids(&[("ETH", "3000.0")]))
        }

        async fn user_state(&self, address: &str) -> Result<ClearinghouseState> {
            self.calls.borrow_mut().push(format!("perp:{address}"));
            self.perps
                .get(address)
                .cloned()
                .ok_or_else(|| DashboardError::HyperliquidApi(format!("HTTP 422: {address}")))
        }

        async fn spot_user_state(&self, address: &str) -> Result<SpotClearinghouseState> {
            self.calls.borrow_mut().push(format!("spot:{address}"));
            self.spots
                .get(address)
                .cloned()
                .ok_or_else(|| DashboardError::HyperliquidApi(format!("HTTP 422: {address}")))
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn exchange() -> FakeExchange {
        FakeExchange::new()
            .with_account(
                "0xmain",
                perp_state(
                    "1000",
                    "120",
                    "2000",
                    vec![raw_position("ETH", "2000", "2000", "100", Some("1500"), "-2.5")],
                ),
                SpotClearinghouseState {
                    balances: vec![balance(0, "USDC", "50"), balance(1, "ETH", "2.5")],
                },
            )
            .with_account(
                "0xdust",
                perp_state("0", "0", "0", vec![]),
                SpotClearinghouseState { balances: vec![] },
            )
    }

    #[tokio::test]
    async fn test_build_snapshot_in_configured_order() {
        let exchange = exchange();
        let accounts = vec![
            AccountIdentity::new("Dust", "0xdust"),
            AccountIdentity::new("Main", "0xmain"),
        ];

        let snapshot = build_snapshot(&exchange, &accounts, generated_at())
            .await
            .unwrap();

        let labels: Vec<_> = snapshot.accounts.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Dust", "Main"]);
        assert_eq!(
            *exchange.calls.borrow(),
            vec![
                "spotMeta",
                "allMids",
                "perp:0xdust",
                "spot:0xdust",
                "perp:0xmain",
                "spot:0xmain"
            ]
        );

        let main = &snapshot.accounts[1];
        assert_eq!(main.spot[0].coin, "ETH");
        assert!((main.spot[0].usd_value - 7500.0).abs() < 1e-9);
        assert!((main.spot[1].usd_value - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_build_snapshot_aborts_on_failed_account() {
        let exchange = exchange();
        let accounts = vec![
            AccountIdentity::new("Main", "0xmain"),
            AccountIdentity::new("Missing", "0xnope"),
            AccountIdentity::new("Dust", "0xdust"),
        ];

        let err = build_snapshot(&exchange, &accounts, generated_at())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::HyperliquidApi(_)));
        assert!(!exchange.calls.borrow().iter().any(|c| c.ends_with("0xdust")));
    }

    #[tokio::test]
    async fn test_display_json() {
        let accounts = vec![
            AccountIdentity::new("Main", "0xmain"),
            AccountIdentity::new("Dust", "0xdust"),
        ];
        let snapshot = build_snapshot(&exchange(), &accounts, generated_at())
            .await
            .unwrap();
        let doc = snapshot.display_json();

        assert_eq!(doc["title"], "Hyperliquid Positions");
        assert_eq!(doc["generated_at"], "Date and Time: 2024-05-01 12:30:00 UTC");

        let main = &doc["accounts"][0];
        assert_eq!(main["label"], "Main");
        assert_eq!(main["summary"][0][0]["value"], "$1,000.00");
        assert_eq!(main["summary"][1][0]["value"], "$100.00");
        assert_eq!(main["summary"][1][1]["value"], "-$2.50");
        assert_eq!(main["summary"][1][2]["value"], "2.00");
        assert_eq!(main["summary"][2][0]["value"], "900.00");
        assert_eq!(main["summary"][2][1]["value"], "11.11");
        assert_eq!(main["perp"]["title"], "Perp Positions: 1");
        assert_eq!(main["perp"]["signed"], json!([3, 6]));
        assert_eq!(main["perp"]["rows"][0][4], "1,900.00");
        assert_eq!(main["perp"]["rows"][0][5], "1,500.00");
        assert_eq!(main["spot"]["title"], "Spot Positions: 2");
        assert_eq!(main["spot"]["rows"][0][0], "ETH");
        assert_eq!(main["spot"]["rows"][0][4], "$7,500.00");
        assert_eq!(main["spot"]["rows"][1][2], "NaN");
        assert_eq!(main["spot"]["signed"], json!([]));

        let dust = &doc["accounts"][1];
        assert_eq!(dust["perp"]["empty"], "No Perp Positions open");
        assert_eq!(dust["spot"]["empty"], "No Spot balances");
        assert_eq!(dust["summary"][1].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_display_json_zero_equity_leverage() {
        let exchange = FakeExchange::new().with_account(
            "0xdrained",
            perp_state(
                "0",
                "0",
                "500",
                vec![raw_position("SOL", "100", "500", "-20", None, "0")],
            ),
            SpotClearinghouseState { balances: vec![] },
        );
        let accounts = vec![AccountIdentity::new("Drained", "0xdrained")];

        let snapshot = build_snapshot(&exchange, &accounts, generated_at())
            .await
            .unwrap();
        let metrics = snapshot.accounts[0].perp.metrics.unwrap();
        assert!(metrics.leverage.is_infinite());

        let doc = snapshot.display_json();
        let summary = &doc["accounts"][0]["summary"];
        assert_eq!(summary[1][2]["label"], "Leverage");
        assert_eq!(summary[1][2]["value"], "inf");
        assert_eq!(summary[2][0]["value"], "20.00");
        assert_eq!(summary[2][1]["value"], "-100.00");
    }
}
