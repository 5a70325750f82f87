//! Account service: orchestrates the store, mailer, and session ports.
//!
//! Registration checks fields in the order the form does (email format,
//! password strength, confirmation match, duplicate pre-check), then builds
//! the records, delivers the verification mail, and only then commits. The
//! store remains the authority on uniqueness; the pre-check only exists to
//! answer early without sending mail.

use chrono::Utc;
use tracing::{error, info, warn};

use connectcargo_accounts::{
    Account, AccountRole, AccountStatus, AuthError, ContactInfo, Email, TokenPurpose, gate,
    password,
};
use connectcargo_core::{AccountId, SessionId};
use connectcargo_profiles::{Profile, ProfileAttributes};

use crate::account_store::{AccountStore, AccountStoreError};
use crate::mailer::{Mailer, OutboundMail};
use crate::session_store::SessionStore;

/// Raw registration field values, as submitted.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: AccountRole,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Outcome of a committed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub account_id: AccountId,
    pub status: AccountStatus,
}

/// The account lifecycle service, generic over its three ports.
pub struct AccountService<S, M, Z> {
    store: S,
    mailer: M,
    sessions: Z,
    base_url: String,
}

impl<S, M, Z> AccountService<S, M, Z>
where
    S: AccountStore,
    M: Mailer,
    Z: SessionStore,
{
    pub fn new(store: S, mailer: M, sessions: Z, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            mailer,
            sessions,
            base_url,
        }
    }

    /// Register a new account in the strict-verification flow.
    ///
    /// The account starts `PendingVerification` with a 24 h verification
    /// token. Nothing is persisted when validation, mail delivery, or the
    /// store write fails.
    pub fn register(&self, req: RegistrationRequest) -> Result<RegistrationReceipt, AuthError> {
        let email = Email::parse(&req.email)?;
        password::validate_strength(&req.password)?;
        if req.password != req.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        // Early answer for the common case; the store index closes the race.
        if self.find_by_email(&email)?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let now = Utc::now();
        let contact = ContactInfo {
            phone: req.phone.clone(),
            ..ContactInfo::default()
        };
        let mut account = Account::register(
            AccountId::new(),
            email.clone(),
            &req.password,
            req.role,
            contact,
            now,
        )?;
        let token = account.issue_token(TokenPurpose::Verification, now);

        let profile = Profile::bind_new(
            account.account_id(),
            req.role,
            ProfileAttributes::named(req.full_name.trim()),
            now,
        )
        .map_err(|e| {
            warn!(error = %e, "profile binding rejected registration");
            AuthError::RegistrationFailed
        })?;

        // Strict variant: no delivery, no account.
        self.mailer
            .deliver(OutboundMail {
                to: email.clone(),
                purpose: TokenPurpose::Verification,
                link: self.link("verify-email", token.secret()),
                queued_at: now,
            })
            .map_err(|e| {
                warn!(error = %e, email = %email, "verification mail failed; registration aborted");
                AuthError::RegistrationFailed
            })?;

        match self.store.register(account, profile) {
            Ok(account_id) => {
                info!(%account_id, role = %req.role, "account registered, verification pending");
                Ok(RegistrationReceipt {
                    account_id,
                    status: AccountStatus::PendingVerification,
                })
            }
            Err(AccountStoreError::DuplicateEmail) => Err(AuthError::DuplicateEmail),
            Err(AccountStoreError::ProfileAlreadyBound) => Err(AuthError::ProfileAlreadyBound),
            Err(e) => {
                error!(error = %e, "registration write failed");
                Err(AuthError::RegistrationFailed)
            }
        }
    }

    /// Check credentials and keep the lockout bookkeeping.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// A locked account answers `LockedOut` even to the correct password.
    pub fn authenticate(&self, email_raw: &str, password: &str) -> Result<Account, AuthError> {
        let Ok(email) = Email::parse(email_raw) else {
            return Err(AuthError::InvalidCredentials);
        };
        // Fail closed: a lookup failure answers like a credential mismatch.
        let mut account = match self.store.find_by_email(&email) {
            Ok(Some(account)) => account,
            Ok(None) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                error!(error = %e, "email lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if account.is_locked_out() {
            return Err(AuthError::LockedOut);
        }

        let now = Utc::now();
        if account.password_matches(password) {
            account.record_login_success(now);
            self.persist_bookkeeping(&account);
            Ok(account)
        } else {
            let locked_now = account.record_login_failure(now);
            self.persist_bookkeeping(&account);
            if locked_now {
                warn!(account_id = %account.account_id(), "account locked out");
                Err(AuthError::LockedOut)
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Authenticate, require an active account, and open a session.
    pub fn login(&self, email: &str, password: &str) -> Result<(SessionId, Account), AuthError> {
        let account = self.authenticate(email, password)?;
        gate::ensure_active(&account)?;
        let session = self.sessions.open(account.account_id());
        info!(account_id = %account.account_id(), "session opened");
        Ok((session, account))
    }

    /// Invalidate a session. Returns whether it was live.
    pub fn logout(&self, session: SessionId) -> bool {
        self.sessions.revoke(session)
    }

    /// Consume a verification token and activate the owning account.
    pub fn verify_email(&self, token: &str) -> Result<Account, AuthError> {
        match self.store.consume_verification_token(token, Utc::now()) {
            Ok(account) => {
                info!(account_id = %account.account_id(), "email verified, account active");
                Ok(account)
            }
            Err(e) => Err(map_token_error(e, AuthError::VerificationFailed)),
        }
    }

    /// Non-consuming token check, used to answer "is this link still good"
    /// (e.g. before showing the reset form) without burning the token.
    pub fn validate_token(&self, purpose: TokenPurpose, token: &str) -> Result<Account, AuthError> {
        self.store
            .validate_token(purpose, token, Utc::now())
            .map_err(|e| map_token_error(e, AuthError::VerificationFailed))
    }

    /// Issue and mail a reset token when the address belongs to a verified
    /// account. Always "succeeds" so callers cannot probe for accounts.
    pub fn request_password_reset(&self, email_raw: &str) {
        let Ok(email) = Email::parse(email_raw) else {
            return;
        };
        let Ok(Some(mut account)) = self.store.find_by_email(&email) else {
            return;
        };
        if !account.is_email_verified() {
            return;
        }

        let now = Utc::now();
        let token = account.issue_token(TokenPurpose::Reset, now);
        if let Err(e) = self.store.update(&account) {
            warn!(error = %e, "storing reset token failed");
            return;
        }
        if let Err(e) = self.mailer.deliver(OutboundMail {
            to: email,
            purpose: TokenPurpose::Reset,
            link: self.link("reset-password", token.secret()),
            queued_at: now,
        }) {
            warn!(error = %e, "reset mail delivery failed");
        }
    }

    /// Consume a reset token and install the new password.
    pub fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        password::validate_strength(new_password)?;
        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        match self
            .store
            .consume_reset_token(token, new_password, Utc::now())
        {
            Ok(account) => {
                info!(account_id = %account.account_id(), "password reset completed");
                Ok(())
            }
            Err(e) => Err(map_token_error(e, AuthError::VerificationFailed)),
        }
    }

    /// Resolve a session to its account.
    pub fn session_account(&self, session: SessionId) -> Result<Account, AuthError> {
        let account_id = self
            .sessions
            .resolve(session)
            .ok_or(gate::AccessDenied::NoSession)?;
        match self.store.get(account_id) {
            Ok(Some(account)) => Ok(account),
            Ok(None) => {
                error!(%account_id, "live session references a missing account");
                Err(gate::AccessDenied::NoSession.into())
            }
            Err(e) => {
                error!(error = %e, "account lookup failed");
                Err(gate::AccessDenied::NoSession.into())
            }
        }
    }

    /// Resolve a session and authorize it for a role-gated section.
    pub fn authorize_session(
        &self,
        session: SessionId,
        required: AccountRole,
    ) -> Result<Account, AuthError> {
        let account = self.session_account(session)?;
        gate::authorize(&account, required)?;
        Ok(account)
    }

    /// The profile bound to an account, if any.
    pub fn profile_of(&self, account_id: AccountId) -> Option<Profile> {
        match self.store.profile_of(account_id) {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = %e, "profile lookup failed");
                None
            }
        }
    }

    /// `(valid, exists)` for a candidate address (registration form helper).
    pub fn email_status(&self, raw: &str) -> (bool, bool) {
        match Email::parse(raw) {
            Ok(email) => {
                let exists = matches!(self.store.find_by_email(&email), Ok(Some(_)));
                (true, exists)
            }
            Err(_) => (false, false),
        }
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError> {
        self.store.find_by_email(email).map_err(|e| {
            error!(error = %e, "email lookup failed");
            AuthError::RegistrationFailed
        })
    }

    /// Login bookkeeping is best-effort: an update failure must not turn a
    /// decided authentication outcome into a different answer.
    fn persist_bookkeeping(&self, account: &Account) {
        if let Err(e) = self.store.update(account) {
            error!(error = %e, account_id = %account.account_id(), "login bookkeeping write failed");
        }
    }

    fn link(&self, action: &str, secret: &str) -> String {
        format!("{}/auth/{}/{}", self.base_url, action, secret)
    }
}

fn map_token_error(err: AccountStoreError, fallback: AuthError) -> AuthError {
    match err {
        AccountStoreError::TokenNotFound => AuthError::InvalidToken,
        AccountStoreError::TokenExpired => AuthError::ExpiredToken,
        AccountStoreError::Credential(e) => e,
        other => {
            error!(error = %other, "token consumption failed");
            fallback
        }
    }
}
