//! Password strength policy and one-way hashing.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AuthError;

const PBKDF2_ROUNDS: u32 = 100_000;
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const SCHEME: &str = "pbkdf2-sha256";

/// Symbols accepted by the strength policy.
const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate password strength, reporting the first failing rule.
///
/// Rule order: length, uppercase, lowercase, digit, symbol.
pub fn validate_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < 8 {
        return Err(weak("password must be at least 8 characters long"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(weak("password must contain at least one uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(weak("password must contain at least one lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(weak("password must contain at least one number"));
    }
    if !password.chars().any(|c| SYMBOLS.contains(c)) {
        return Err(weak("password must contain at least one special character"));
    }
    Ok(())
}

fn weak(msg: &str) -> AuthError {
    AuthError::WeakPassword(msg.to_string())
}

/// Salted PBKDF2-HMAC-SHA256 password hash.
///
/// Stored as `pbkdf2-sha256$<rounds>$<salt hex>$<digest hex>` so the round
/// count can be raised later without invalidating existing credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a raw password with a fresh random salt.
    pub fn from_raw(raw: &str) -> Self {
        let salt: [u8; SALT_LEN] = rand::thread_rng().r#gen();
        Self::derive(raw, &salt, PBKDF2_ROUNDS)
    }

    fn derive(raw: &str, salt: &[u8], rounds: u32) -> Self {
        let mut digest = [0u8; DIGEST_LEN];
        pbkdf2::<Hmac<Sha256>>(raw.as_bytes(), salt, rounds, &mut digest);
        Self(format!(
            "{SCHEME}${rounds}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    /// Verify a raw password against this hash in constant time.
    pub fn verify(&self, raw: &str) -> bool {
        let mut parts = self.0.split('$');
        let (Some(scheme), Some(rounds), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        if scheme != SCHEME {
            return false;
        }
        let Ok(rounds) = rounds.parse::<u32>() else {
            return false;
        };
        let Ok(salt) = hex::decode(salt) else {
            return false;
        };
        let Ok(expected) = hex::decode(digest) else {
            return false;
        };

        let mut candidate = [0u8; DIGEST_LEN];
        pbkdf2::<Hmac<Sha256>>(raw.as_bytes(), &salt, rounds, &mut candidate);
        constant_time_eq(&candidate, &expected)
    }

    /// The encoded hash as stored in the persistence port.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Byte comparison without early exit, for secrets (hash digests, tokens).
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strength_rules_report_first_failure() {
        let cases = [
            ("Sh0r!t", "at least 8 characters"),
            ("str0ng!pass", "uppercase"),
            ("STR0NG!PASS", "lowercase"),
            ("Strong!Pass", "number"),
            ("Str0ngPass", "special character"),
        ];
        for (password, fragment) in cases {
            match validate_strength(password) {
                Err(AuthError::WeakPassword(msg)) => {
                    assert!(msg.contains(fragment), "{password}: {msg}")
                }
                other => panic!("{password}: expected WeakPassword, got {other:?}"),
            }
        }
    }

    #[test]
    fn strength_accepts_policy_compliant_password() {
        assert!(validate_strength("Str0ng!Pass").is_ok());
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = PasswordHash::from_raw("Str0ng!Pass");
        assert!(hash.verify("Str0ng!Pass"));
        assert!(!hash.verify("Str0ng!Pess"));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let a = PasswordHash::from_raw("Str0ng!Pass");
        let b = PasswordHash::from_raw("Str0ng!Pass");
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify("Str0ng!Pass") && b.verify("Str0ng!Pass"));
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        let mangled = PasswordHash("not-a-hash".to_string());
        assert!(!mangled.verify("Str0ng!Pass"));
        let wrong_scheme = PasswordHash("md5$1$00$00".to_string());
        assert!(!wrong_scheme.verify("Str0ng!Pass"));
    }

    #[test]
    fn constant_time_eq_basic_properties() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    proptest! {
        /// Any password missing a character class fails validation.
        #[test]
        fn passwords_without_digits_are_rejected(
            password in "[A-Za-z!@#$%^&*]{8,24}"
        ) {
            prop_assert!(validate_strength(&password).is_err());
        }

        /// Any password shorter than 8 characters fails validation, whatever
        /// classes it contains.
        #[test]
        fn short_passwords_are_rejected(password in ".{0,7}") {
            prop_assert!(validate_strength(&password).is_err());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 4, ..ProptestConfig::default() })]

        /// Hashing is one-way stable: a policy-compliant password always
        /// verifies against its own freshly salted hash.
        #[test]
        fn compliant_passwords_verify_after_hashing(
            body in "[a-z]{4,8}", digit in 0u8..10, symbol_ix in 0usize..10
        ) {
            let symbol = SYMBOLS.chars().nth(symbol_ix).unwrap();
            let password = format!("A{body}{digit}{symbol}x");
            prop_assume!(validate_strength(&password).is_ok());
            let hash = PasswordHash::from_raw(&password);
            prop_assert!(hash.verify(&password));
        }
    }
}
