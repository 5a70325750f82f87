//! Time-limited opaque tokens for email verification and password reset.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::password::constant_time_eq;

/// Entropy of a freshly issued token, before encoding.
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// The two independent token purposes. Issuing for one purpose never touches
/// the other purpose's token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Verification,
    Reset,
}

impl TokenPurpose {
    /// Verification links live a day; reset links one hour.
    pub fn lifetime(self) -> Duration {
        match self {
            TokenPurpose::Verification => Duration::hours(24),
            TokenPurpose::Reset => Duration::hours(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::Verification => "verification",
            TokenPurpose::Reset => "reset",
        }
    }
}

impl core::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-use token plus its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Issue a fresh URL-safe token for `purpose`.
    pub fn issue(purpose: TokenPurpose, now: DateTime<Utc>) -> Self {
        let bytes: [u8; TOKEN_ENTROPY_BYTES] = rand::thread_rng().r#gen();
        Self {
            secret: URL_SAFE_NO_PAD.encode(bytes),
            expires_at: now + purpose.lifetime(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Strict expiry check: live only while `now` is before `expires_at`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Exact match against a presented secret, without early exit.
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.secret.as_bytes(), presented.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_is_url_safe_and_long_enough() {
        let token = IssuedToken::issue(TokenPurpose::Verification, Utc::now());
        // 32 bytes -> 43 base64 characters without padding.
        assert_eq!(token.secret().len(), 43);
        assert!(
            token
                .secret()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn lifetimes_follow_purpose() {
        let now = Utc::now();
        let verification = IssuedToken::issue(TokenPurpose::Verification, now);
        let reset = IssuedToken::issue(TokenPurpose::Reset, now);
        assert_eq!(verification.expires_at() - now, Duration::hours(24));
        assert_eq!(reset.expires_at() - now, Duration::hours(1));
    }

    #[test]
    fn expiry_is_strict() {
        let now = Utc::now();
        let token = IssuedToken::issue(TokenPurpose::Reset, now);
        assert!(token.is_live_at(now));
        assert!(token.is_live_at(token.expires_at() - Duration::seconds(1)));
        // Exactly at expiry the token is dead: `now < expires_at` only.
        assert!(!token.is_live_at(token.expires_at()));
        assert!(!token.is_live_at(token.expires_at() + Duration::seconds(1)));
    }

    #[test]
    fn matches_is_exact() {
        let token = IssuedToken::issue(TokenPurpose::Verification, Utc::now());
        assert!(token.matches(token.secret()));
        assert!(!token.matches(""));
        assert!(!token.matches(&token.secret()[..42]));
        let other = IssuedToken::issue(TokenPurpose::Verification, Utc::now());
        assert!(!token.matches(other.secret()));
    }
}
