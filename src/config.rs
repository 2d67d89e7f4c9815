//! Configuration management for the dashboard

use worker::Env;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{DashboardError, Result};
use crate::types::AccountIdentity;

/// Accounts shown when `ACCOUNTS` is not set: `Label=SECRET_BINDING`
pub const DEFAULT_ACCOUNTS: &str =
    "Main Account-72a9=MAIN_ACCOUNT,Dust-41d5=DUST,Hold-aff3=HOLD,Vault-ba36=VAULT";

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level ("debug" enables per-account log lines)
    pub log_level: String,

    /// Hyperliquid API base URL
    pub api_url: String,

    /// Accounts in display order
    pub accounts: Vec<AccountIdentity>,

    /// Dashboard access password
    pub password: String,
}

/// One `Label=SECRET_BINDING` entry of the `ACCOUNTS` variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSpec {
    pub label: String,
    pub secret: String,
}

impl Config {
    /// Load configuration from Cloudflare environment variables and secrets
    pub fn from_env(env: &Env) -> Result<Self> {
        let specs = parse_account_specs(
            &env.var("ACCOUNTS")
                .map_or_else(|_| DEFAULT_ACCOUNTS.to_string(), |v| v.to_string()),
        )?;

        let accounts = specs
            .into_iter()
            .map(|spec| {
                let address = env
                    .secret(&spec.secret)
                    .map_err(|_| {
                        DashboardError::Config(format!(
                            "{} secret not found for account {}",
                            spec.secret, spec.label
                        ))
                    })?
                    .to_string();
                Ok(AccountIdentity::new(spec.label, address))
            })
            .collect::<Result<Vec<_>>>()?;

        let password = env
            .secret("DASHBOARD_PASSWORD")
            .map_err(|_| DashboardError::Config("DASHBOARD_PASSWORD secret not found".into()))?
            .to_string();

        let config = Self {
            environment: env
                .var("ENVIRONMENT")
                .map_or_else(|_| "production".to_string(), |v| v.to_string()),

            log_level: env
                .var("LOG_LEVEL")
                .map_or_else(|_| "info".to_string(), |v| v.to_string()),

            api_url: env
                .var("HYPERLIQUID_API_URL")
                .map_or_else(|_| DEFAULT_BASE_URL.to_string(), |v| v.to_string()),

            accounts,
            password,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(DashboardError::Config(format!(
                "HYPERLIQUID_API_URL must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        if self.accounts.is_empty() {
            return Err(DashboardError::Config("At least one account required".into()));
        }
        if let Some(account) = self.accounts.iter().find(|a| a.address.trim().is_empty()) {
            return Err(DashboardError::Config(format!(
                "Empty address for account {}",
                account.label
            )));
        }
        if self.password.is_empty() {
            return Err(DashboardError::Config("DASHBOARD_PASSWORD is empty".into()));
        }
        Ok(())
    }

    pub fn is_debug(&self) -> bool {
        self.log_level.eq_ignore_ascii_case("debug")
    }
}

/// Parse `Label=SECRET_BINDING,...` keeping the listed order
pub fn parse_account_specs(raw: &str) -> Result<Vec<AccountSpec>> {
    let mut specs: Vec<AccountSpec> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (label, secret) = entry.split_once('=').ok_or_else(|| {
            DashboardError::Config(format!("ACCOUNTS entry {entry:?} is not Label=SECRET"))
        })?;
        let (label, secret) = (label.trim(), secret.trim());

        if label.is_empty() || secret.is_empty() {
            return Err(DashboardError::Config(format!(
                "ACCOUNTS entry {entry:?} has an empty label or secret name"
            )));
        }
        if specs.iter().any(|s| s.label == label) {
            return Err(DashboardError::Config(format!(
                "Duplicate account label {label:?}"
            )));
        }

        specs.push(AccountSpec {
            label: label.to_string(),
            secret: secret.to_string(),
        });
    }

    if specs.is_empty() {
        return Err(DashboardError::Config("ACCOUNTS lists no accounts".into()));
    }
    Ok(specs)
}
