//! Hyperliquid info API client
//!
//! Read-only access to the `POST /info` endpoint:
//! - Spot universe metadata and mid prices
//! - Perp clearinghouse state per address
//! - Spot clearinghouse state per address
//!
//! No retries: a failed request is returned to the caller as-is.

use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::types::{
    AllMids, ClearinghouseState, InfoRequest, SpotClearinghouseState, SpotMetaAndAssetCtxs,
};

pub const DEFAULT_BASE_URL: &str = "https://api.hyperliquid.xyz";

/// Source of exchange data consumed by the aggregation core.
///
/// `HyperliquidClient` is the production implementation; tests substitute an
/// in-memory source.
#[allow(async_fn_in_trait)] // Worker futures are single-threaded
pub trait InfoSource {
    async fn spot_meta_and_asset_ctxs(&self) -> Result<SpotMetaAndAssetCtxs>;
    async fn all_mids(&self) -> Result<AllMids>;
    async fn user_state(&self, address: &str) -> Result<ClearinghouseState>;
    async fn spot_user_state(&self, address: &str) -> Result<SpotClearinghouseState>;
}

/// Hyperliquid API client
pub struct HyperliquidClient {
    base_url: String,
    http: reqwest::Client,
}

impl HyperliquidClient {
    /// Create new client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Perform an info request
    async fn info<T: for<'de> Deserialize<'de>>(&self, request: &InfoRequest) -> Result<T> {
        let response = self
            .http
            .post(info_endpoint(&self.base_url))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response, checking for errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(DashboardError::RateLimit(retry_after));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(DashboardError::HyperliquidApi(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        response.json().await.map_err(DashboardError::from)
    }
}

/// `POST /info` URL for a base URL, tolerating a trailing slash
fn info_endpoint(base_url: &str) -> String {
    format!("{}/info", base_url.trim_end_matches('/'))
}

impl Default for HyperliquidClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl InfoSource for HyperliquidClient {
    async fn spot_meta_and_asset_ctxs(&self) -> Result<SpotMetaAndAssetCtxs> {
        self.info(&InfoRequest::SpotMetaAndAssetCtxs).await
    }

    async fn all_mids(&self) -> Result<AllMids> {
        self.info(&InfoRequest::AllMids).await
    }

    async fn user_state(&self, address: &str) -> Result<ClearinghouseState> {
        self.info(&InfoRequest::ClearinghouseState {
            user: address.to_string(),
        })
        .await
    }

    async fn spot_user_state(&self, address: &str) -> Result<SpotClearinghouseState> {
        self.info(&InfoRequest::SpotClearinghouseState {
            user: address.to_string(),
        })
        .await
    }
}
