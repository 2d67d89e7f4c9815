//! Hyperliquid Dashboard - password-protected positions overview on Cloudflare Workers
//!
//! Shows, for a fixed set of Hyperliquid addresses, the perp account summary,
//! open perp positions and spot balances valued at current mid prices.
//!
//! # Architecture
//! - Main entry point handles HTTP requests (dashboard, login, JSON API)
//! - `reference`: token index and mid price lookups, loaded once per page load
//! - `portfolio`: pure per-account aggregation (PnL, leverage, spot USD value)
//! - `snapshot`: sequential fetch + aggregation and the display projection
//!
//! Read-only: nothing is persisted and nothing is written to the exchange.

// Clippy configuration for dashboard code patterns
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::if_not_else)] // Readability preference

mod auth;
mod client;
mod config;
mod dashboard;
mod error;
mod portfolio;
mod reference;
mod snapshot;
mod types;

use worker::{
    Context, Env, FormEntry, Headers, Request, Response, Router, console_error, console_log,
    console_warn, event,
};

pub use auth::PasswordGate;
pub use client::{HyperliquidClient, InfoSource};
pub use config::Config;
pub use error::DashboardError;
pub use portfolio::{
    AccountReport, PerpAccountSummary, PerpMetrics, PerpPosition, SpotHolding, aggregate_account,
    aggregate_perps, aggregate_spot,
};
pub use reference::ReferenceData;
pub use snapshot::{DashboardSnapshot, build_snapshot};
pub use types::*;

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard UI (or password page)
        .get("/", |req, ctx| index(&req, &ctx.env))
        .get("/dashboard", |req, ctx| index(&req, &ctx.env))
        // Password gate
        .post_async("/login", |req, ctx| async move { login(req, &ctx.env).await })
        .post_async("/logout", |_req, _ctx| async move {
            redirect_home(&auth::clear_session_cookie())
        })
        // Account snapshot for the dashboard page
        .get_async("/api/accounts", |req, ctx| async move {
            accounts(&req, &ctx.env).await
        })
        // Fallback
        .run(req, env)
        .await
}

/// Load config, turning a failure into the 500 response every route returns
fn load_config(env: &Env) -> std::result::Result<Config, WResult<Response>> {
    Config::from_env(env).map_err(|e| {
        console_error!("Config error: {}", e);
        Response::error(format!("Config error: {e}"), 500)
    })
}

fn is_authorized(req: &Request, gate: &PasswordGate) -> WResult<bool> {
    let cookie = req.headers().get("Cookie")?;
    Ok(gate.is_authorized(cookie.as_deref()))
}

fn redirect_home(cookie: &str) -> WResult<Response> {
    let mut headers = Headers::new();
    headers.set("Location", "/")?;
    headers.set("Set-Cookie", cookie)?;
    Ok(Response::empty()?.with_status(303).with_headers(headers))
}

/// Dashboard for an authenticated session, password page otherwise
fn index(req: &Request, env: &Env) -> WResult<Response> {
    let config = match load_config(env) {
        Ok(c) => c,
        Err(response) => return response,
    };
    let gate = PasswordGate::new(&config.password);

    if is_authorized(req, &gate)? {
        Response::from_html(dashboard::dashboard_html())
    } else {
        Response::from_html(dashboard::login_html(false))
    }
}

/// Check the submitted password and start a session
async fn login(mut req: Request, env: &Env) -> WResult<Response> {
    let config = match load_config(env) {
        Ok(c) => c,
        Err(response) => return response,
    };
    let gate = PasswordGate::new(&config.password);

    // Non-form bodies are treated like a missing field
    let submitted = match req.form_data().await {
        Ok(form) => match form.get("password") {
            Some(FormEntry::Field(value)) => Some(value),
            _ => None,
        },
        Err(e) => {
            console_warn!("Unreadable login form: {}", e);
            None
        }
    };

    match gate.login(submitted.as_deref()) {
        Ok(cookie) => redirect_home(&cookie),
        Err(e) => {
            console_warn!("Rejected dashboard login attempt: {}", e);
            Ok(Response::from_html(dashboard::login_html(true))?.with_status(401))
        }
    }
}

/// Build the snapshot for every configured account
async fn accounts(req: &Request, env: &Env) -> WResult<Response> {
    let config = match load_config(env) {
        Ok(c) => c,
        Err(response) => return response,
    };
    let gate = PasswordGate::new(&config.password);
    if !is_authorized(req, &gate)? {
        return Response::error("Unauthorized", 401);
    }

    let request_id = uuid::Uuid::new_v4();
    let started = chrono::Utc::now();
    console_log!(
        "[{}] Loading snapshot for {} accounts",
        request_id,
        config.accounts.len()
    );

    let client = HyperliquidClient::new(config.api_url.as_str());
    match build_snapshot(&client, &config.accounts, started).await {
        Ok(snapshot) => {
            if config.is_debug() {
                for report in &snapshot.accounts {
                    console_log!(
                        "[{}] {}: {} perp positions, {} spot balances",
                        request_id,
                        report.label,
                        report.perp.positions.len(),
                        report.spot.len()
                    );
                }
            }
            console_log!(
                "[{}] Snapshot ready in {}ms",
                request_id,
                (chrono::Utc::now() - started).num_milliseconds()
            );
            Response::from_json(&snapshot.display_json())
        }
        Err(e) => {
            console_error!("[{}] Snapshot failed: {}", request_id, e);
            Ok(Response::from_json(&serde_json::json!({
                "error": true,
                "message": format!("{e}"),
            }))?
            .with_status(502))
        }
    }
}
