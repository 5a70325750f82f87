//! Account entity: the authentication identity and lifecycle of one actor.
//!
//! # Invariants
//! - The role is chosen at registration and never changes.
//! - `email_verified` implies the status is no longer `PendingVerification`.
//! - At most one token per purpose is live; issuing replaces the prior token
//!   of the same purpose only.
//! - The failed-login counter resets to zero on any successful
//!   authentication.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use connectcargo_core::{AccountId, Entity};

use crate::email::Email;
use crate::error::AuthError;
use crate::password::{self, PasswordHash};
use crate::token::{IssuedToken, TokenPurpose};

/// Consecutive failed logins that trigger a lockout.
pub const LOCKOUT_THRESHOLD: u32 = 5;

/// The two mutually exclusive actor roles of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// A shipper publishing loads.
    Company,
    /// A freight carrier taking loads.
    Carrier,
}

impl AccountRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountRole::Company => "company",
            AccountRole::Carrier => "carrier",
        }
    }
}

impl core::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "company" => Ok(AccountRole::Company),
            "carrier" => Ok(AccountRole::Carrier),
            other => Err(AuthError::InvalidRole(other.to_string())),
        }
    }
}

/// Account lifecycle status.
///
/// `Suspended` and `Inactive` are administrative states; nothing in this
/// crate transitions into or out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    PendingVerification,
    Active,
    Suspended,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::PendingVerification => "pending_verification",
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Credential-store record for one company or carrier actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    email: Email,
    password_hash: PasswordHash,
    role: AccountRole,
    contact: ContactInfo,
    status: AccountStatus,
    email_verified: bool,
    verification_token: Option<IssuedToken>,
    reset_token: Option<IssuedToken>,
    failed_attempts: u32,
    lockout_date: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
    verification_date: Option<DateTime<Utc>>,
    registered_at: DateTime<Utc>,
    terms_accepted_at: DateTime<Utc>,
}

impl Account {
    /// Register a new account in the strict-verification flow: password is
    /// checked against the strength policy and hashed, the lifecycle starts
    /// at `PendingVerification`, and terms acceptance is recorded.
    pub fn register(
        id: AccountId,
        email: Email,
        raw_password: &str,
        role: AccountRole,
        contact: ContactInfo,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        password::validate_strength(raw_password)?;
        Ok(Self {
            id,
            email,
            password_hash: PasswordHash::from_raw(raw_password),
            role,
            contact,
            status: AccountStatus::PendingVerification,
            email_verified: false,
            verification_token: None,
            reset_token: None,
            failed_attempts: 0,
            lockout_date: None,
            last_login: None,
            verification_date: None,
            registered_at: now,
            terms_accepted_at: now,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn lockout_date(&self) -> Option<DateTime<Utc>> {
        self.lockout_date
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    pub fn verification_date(&self) -> Option<DateTime<Utc>> {
        self.verification_date
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn terms_accepted_at(&self) -> DateTime<Utc> {
        self.terms_accepted_at
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout_date.is_some()
    }

    /// Password comparison only; lockout and status gating are the caller's
    /// responsibility so the check order stays observable in one place.
    pub fn password_matches(&self, raw: &str) -> bool {
        self.password_hash.verify(raw)
    }

    /// Record a failed login. The failure that reaches the threshold stamps
    /// the lockout date. Returns whether the account is now locked out.
    pub fn record_login_failure(&mut self, now: DateTime<Utc>) -> bool {
        self.failed_attempts += 1;
        if self.failed_attempts >= LOCKOUT_THRESHOLD && self.lockout_date.is_none() {
            self.lockout_date = Some(now);
        }
        self.is_locked_out()
    }

    /// Record a successful authentication: counter back to zero, last login
    /// stamped.
    pub fn record_login_success(&mut self, now: DateTime<Utc>) {
        self.failed_attempts = 0;
        self.last_login = Some(now);
    }

    /// The live token slot for `purpose`, if any.
    pub fn token(&self, purpose: TokenPurpose) -> Option<&IssuedToken> {
        match purpose {
            TokenPurpose::Verification => self.verification_token.as_ref(),
            TokenPurpose::Reset => self.reset_token.as_ref(),
        }
    }

    /// Issue a fresh token for `purpose`, replacing any prior token of that
    /// purpose. The other purpose's slot is untouched.
    pub fn issue_token(&mut self, purpose: TokenPurpose, now: DateTime<Utc>) -> IssuedToken {
        let token = IssuedToken::issue(purpose, now);
        match purpose {
            TokenPurpose::Verification => self.verification_token = Some(token.clone()),
            TokenPurpose::Reset => self.reset_token = Some(token.clone()),
        }
        token
    }

    /// Consume the verification token: mark the email verified, activate a
    /// pending account, stamp the verification date, clear the slot.
    ///
    /// Fails with `InvalidToken` when no verification token is held (already
    /// consumed, or never issued).
    pub fn confirm_email(&mut self, now: DateTime<Utc>) -> Result<(), AuthError> {
        if self.verification_token.is_none() {
            return Err(AuthError::InvalidToken);
        }
        self.verification_token = None;
        self.email_verified = true;
        self.verification_date = Some(now);
        if self.status == AccountStatus::PendingVerification {
            self.status = AccountStatus::Active;
        }
        Ok(())
    }

    /// Consume the reset token and install a new password. Lockout state is
    /// untouched: unlock is an administrative operation, not a reset
    /// side-effect.
    ///
    /// Fails with `InvalidToken` when no reset token is held, or with
    /// `WeakPassword` when the replacement fails the policy.
    pub fn apply_password_reset(&mut self, raw_password: &str) -> Result<(), AuthError> {
        if self.reset_token.is_none() {
            return Err(AuthError::InvalidToken);
        }
        password::validate_strength(raw_password)?;
        self.password_hash = PasswordHash::from_raw(raw_password);
        self.reset_token = None;
        Ok(())
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }
}
