//! Email value object: normalization + conservative format policy.

use serde::{Deserialize, Serialize};

use connectcargo_core::ValueObject;

use crate::error::AuthError;

/// Characters allowed in the local part after the leading alphanumeric.
const LOCAL_CHARS: &str = "._%+-";

/// A normalized (trimmed, ASCII-lowercased) email address.
///
/// The format policy is deliberately stricter than RFC 5321/5322: it prefers
/// rejecting odd-but-technically-valid addresses over admitting malformed
/// ones. Rules: local part at least 4 characters starting with an ASCII
/// alphanumeric, exactly one `@`, and a dotted domain whose final label has
/// at least 2 letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let normalized = raw.trim().to_ascii_lowercase();

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(invalid("missing '@'"));
        };
        if domain.contains('@') {
            return Err(invalid("more than one '@'"));
        }

        if local.len() < 4 {
            return Err(invalid("local part is too short"));
        }
        let mut local_chars = local.chars();
        match local_chars.next() {
            Some(c) if c.is_ascii_alphanumeric() => {}
            _ => return Err(invalid("local part must start with a letter or digit")),
        }
        if !local_chars.all(|c| c.is_ascii_alphanumeric() || LOCAL_CHARS.contains(c)) {
            return Err(invalid("local part contains an unsupported character"));
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(invalid("domain contains an unsupported character"));
        }
        let Some((head, suffix)) = domain.rsplit_once('.') else {
            return Err(invalid("domain has no dot-separated suffix"));
        };
        if head.is_empty() {
            return Err(invalid("domain is incomplete"));
        }
        if suffix.len() < 2 || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("domain suffix must be at least 2 letters"));
        }

        Ok(Self(normalized))
    }

    /// Whether `raw` would pass [`Email::parse`].
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(reason: &str) -> AuthError {
    AuthError::InvalidEmail(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Driver1@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "driver1@example.com");
    }

    #[test]
    fn accepts_common_addresses() {
        for raw in [
            "driver1@example.com",
            "ops.team@connect-cargo.co",
            "a1_x%2+tag@mail.example.org",
        ] {
            assert!(Email::is_valid(raw), "expected valid: {raw}");
        }
    }

    #[test]
    fn rejects_short_local_part() {
        assert!(matches!(
            Email::parse("abc@example.com"),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn rejects_local_part_starting_with_symbol() {
        assert!(!Email::is_valid(".abcd@example.com"));
        assert!(!Email::is_valid("_abcd@example.com"));
    }

    #[test]
    fn rejects_missing_or_duplicate_at() {
        assert!(!Email::is_valid("driver1.example.com"));
        assert!(!Email::is_valid("driver1@@example.com"));
        assert!(!Email::is_valid("driver1@exa@mple.com"));
    }

    #[test]
    fn rejects_undotted_or_short_suffix_domain() {
        assert!(!Email::is_valid("driver1@localhost"));
        assert!(!Email::is_valid("driver1@example.c"));
        assert!(!Email::is_valid("driver1@example.c1"));
        assert!(!Email::is_valid("driver1@.com"));
    }

    #[test]
    fn rejects_unsupported_characters() {
        assert!(!Email::is_valid("driv er@example.com"));
        assert!(!Email::is_valid("driver1@exam ple.com"));
        assert!(!Email::is_valid("driver/1@example.com"));
    }
}
