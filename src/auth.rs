//! Password gate for the dashboard
//!
//! A single shared password guards every page. Sessions are stateless: the
//! cookie carries a token derived from the password with SHA-256, so changing
//! the password logs everyone out.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use crate::error::{DashboardError, Result};

/// Session cookie name
pub const SESSION_COOKIE: &str = "hl_session";

const SESSION_DOMAIN: &[u8] = b"hyperliquid-dashboard/session/v1:";

/// Password gate handler
pub struct PasswordGate {
    password_digest: [u8; 32],
    session_token: String,
}

impl PasswordGate {
    /// Create gate for the configured password
    pub fn new(password: &str) -> Self {
        let session_digest = Sha256::new()
            .chain_update(SESSION_DOMAIN)
            .chain_update(password.as_bytes())
            .finalize();

        Self {
            password_digest: digest(password.as_bytes()),
            session_token: URL_SAFE_NO_PAD.encode(session_digest),
        }
    }

    /// Check a submitted password in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(&self.password_digest, &digest(candidate.as_bytes()))
    }

    /// Token stored in the session cookie after a successful login
    #[cfg(test)]
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Check a login submission and return the `Set-Cookie` value for the
    /// new session.
    ///
    /// A missing password field (including an unreadable form body) is a
    /// rejected attempt, not a server error.
    pub fn login(&self, submitted: Option<&str>) -> Result<String> {
        let candidate =
            submitted.ok_or_else(|| DashboardError::Auth("no password submitted".into()))?;
        if self.verify(candidate) {
            Ok(self.session_cookie())
        } else {
            Err(DashboardError::Auth("password incorrect".into()))
        }
    }

    /// Whether a `Cookie` request header carries a valid session
    pub fn is_authorized(&self, cookie_header: Option<&str>) -> bool {
        cookie_header
            .and_then(|header| cookie_value(header, SESSION_COOKIE))
            .is_some_and(|token| {
                constant_time_eq(
                    &digest(token.as_bytes()),
                    &digest(self.session_token.as_bytes()),
                )
            })
    }

    /// `Set-Cookie` value establishing a session
    pub fn session_cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; Secure; SameSite=Strict",
            self.session_token
        )
    }
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0")
}

fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compare fixed-size digests without early exit
fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extract a cookie value from a `Cookie` header
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
