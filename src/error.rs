//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! Fetch and lookup failures propagate to the route handler untouched.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Hyperliquid API errors
    #[error("Hyperliquid API error: {0}")]
    HyperliquidApi(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: retry after {0} seconds")]
    RateLimit(u64),

    /// Spot metadata missing expected fields
    #[error("Malformed spot metadata: {0}")]
    MalformedMetadata(String),

    /// Token index absent from the token index map
    #[error("Unknown spot token index: {0}")]
    UnknownToken(u32),

    /// Symbol absent from the mid price map
    #[error("No mid price for symbol: {0}")]
    UnknownSymbol(String),

    /// Decimal string that does not parse as a number
    #[error("Invalid decimal for {field}: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err.to_string())
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}
