//! Account persistence port and the in-memory implementation.
//!
//! The store is where the race-sensitive invariants live: email uniqueness
//! is enforced by an index at write time (not only by the service's
//! pre-check), registration writes the account and its profile in one
//! critical section, and token consumption is compare-and-clear.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use connectcargo_accounts::{Account, AuthError, Email, TokenPurpose};
use connectcargo_core::AccountId;
use connectcargo_profiles::Profile;

/// Account store abstraction (the persistence port).
pub trait AccountStore: Send + Sync {
    /// Atomically persist a new account together with its bound profile.
    /// No partial state is observable: either both records exist or neither.
    fn register(&self, account: Account, profile: Profile) -> Result<AccountId, AccountStoreError>;

    /// Get an account by id.
    fn get(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError>;

    /// Look up by normalized email.
    fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError>;

    /// The profile bound to an account.
    fn profile_of(&self, id: AccountId) -> Result<Option<Profile>, AccountStoreError>;

    /// Bind a profile to an existing, not-yet-bound account.
    fn bind_profile(&self, profile: Profile) -> Result<(), AccountStoreError>;

    /// Persist an updated account snapshot.
    fn update(&self, account: &Account) -> Result<(), AccountStoreError>;

    /// Non-mutating exact-match token check: the owning account when the
    /// token is live, `TokenExpired` when past expiry, `TokenNotFound`
    /// otherwise.
    fn validate_token(
        &self,
        purpose: TokenPurpose,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError>;

    /// Compare-and-clear consumption of a verification token: exactly one of
    /// any number of concurrent callers presenting the same token succeeds;
    /// the rest observe `TokenNotFound`. Expired tokens are left in place.
    fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError>;

    /// Compare-and-clear consumption of a reset token, installing the new
    /// password in the same critical section.
    fn consume_reset_token(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError>;
}

/// Account store error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AccountStoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("account already has a profile")]
    ProfileAlreadyBound,
    #[error("account not found")]
    NotFound,
    #[error("token not recognized")]
    TokenNotFound,
    #[error("token expired")]
    TokenExpired,
    /// A domain rule rejected the mutation (e.g. weak replacement password).
    #[error(transparent)]
    Credential(#[from] AuthError),
}

#[derive(Debug, Default)]
struct StoreInner {
    accounts: HashMap<AccountId, Account>,
    profiles: HashMap<AccountId, Profile>,
    /// Normalized email -> account id. The uniqueness constraint.
    email_index: HashMap<String, AccountId>,
}

/// In-memory account store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored accounts (test helper).
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountStore for InMemoryAccountStore {
    fn register(&self, account: Account, profile: Profile) -> Result<AccountId, AccountStoreError> {
        let mut inner = self.inner.write().unwrap();

        let key = account.email().as_str().to_string();
        if inner.email_index.contains_key(&key) {
            return Err(AccountStoreError::DuplicateEmail);
        }

        let id = account.account_id();
        if inner.profiles.contains_key(&id) {
            return Err(AccountStoreError::ProfileAlreadyBound);
        }

        inner.email_index.insert(key, id);
        inner.accounts.insert(id, account);
        inner.profiles.insert(id, profile);
        Ok(id)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        Ok(self.inner.read().unwrap().accounts.get(&id).cloned())
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .email_index
            .get(email.as_str())
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    fn profile_of(&self, id: AccountId) -> Result<Option<Profile>, AccountStoreError> {
        Ok(self.inner.read().unwrap().profiles.get(&id).cloned())
    }

    fn bind_profile(&self, profile: Profile) -> Result<(), AccountStoreError> {
        let mut inner = self.inner.write().unwrap();
        let id = profile.account_id();
        if !inner.accounts.contains_key(&id) {
            return Err(AccountStoreError::NotFound);
        }
        if inner.profiles.contains_key(&id) {
            return Err(AccountStoreError::ProfileAlreadyBound);
        }
        inner.profiles.insert(id, profile);
        Ok(())
    }

    fn update(&self, account: &Account) -> Result<(), AccountStoreError> {
        let mut inner = self.inner.write().unwrap();
        let id = account.account_id();
        if !inner.accounts.contains_key(&id) {
            return Err(AccountStoreError::NotFound);
        }
        inner.accounts.insert(id, account.clone());
        Ok(())
    }

    fn validate_token(
        &self,
        purpose: TokenPurpose,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        let inner = self.inner.read().unwrap();
        let account = inner
            .accounts
            .values()
            .find(|a| a.token(purpose).is_some_and(|t| t.matches(token)))
            .ok_or(AccountStoreError::TokenNotFound)?;

        match account.token(purpose) {
            Some(held) if held.is_live_at(now) => Ok(account.clone()),
            Some(_) => Err(AccountStoreError::TokenExpired),
            None => Err(AccountStoreError::TokenNotFound),
        }
    }

    fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        let mut inner = self.inner.write().unwrap();
        let account = find_by_token(&mut inner, TokenPurpose::Verification, token)
            .ok_or(AccountStoreError::TokenNotFound)?;

        match account.token(TokenPurpose::Verification) {
            Some(held) if !held.is_live_at(now) => return Err(AccountStoreError::TokenExpired),
            Some(_) => {}
            None => return Err(AccountStoreError::TokenNotFound),
        }

        account.confirm_email(now)?;
        Ok(account.clone())
    }

    fn consume_reset_token(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        let mut inner = self.inner.write().unwrap();
        let account = find_by_token(&mut inner, TokenPurpose::Reset, token)
            .ok_or(AccountStoreError::TokenNotFound)?;

        match account.token(TokenPurpose::Reset) {
            Some(held) if !held.is_live_at(now) => return Err(AccountStoreError::TokenExpired),
            Some(_) => {}
            None => return Err(AccountStoreError::TokenNotFound),
        }

        account.apply_password_reset(new_password)?;
        Ok(account.clone())
    }
}

/// Exact-match token lookup inside an already-held write lock.
fn find_by_token<'a>(
    inner: &'a mut StoreInner,
    purpose: TokenPurpose,
    token: &str,
) -> Option<&'a mut Account> {
    inner
        .accounts
        .values_mut()
        .find(|a| a.token(purpose).is_some_and(|t| t.matches(token)))
}

impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    fn register(&self, account: Account, profile: Profile) -> Result<AccountId, AccountStoreError> {
        (**self).register(account, profile)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>, AccountStoreError> {
        (**self).get(id)
    }

    fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountStoreError> {
        (**self).find_by_email(email)
    }

    fn profile_of(&self, id: AccountId) -> Result<Option<Profile>, AccountStoreError> {
        (**self).profile_of(id)
    }

    fn bind_profile(&self, profile: Profile) -> Result<(), AccountStoreError> {
        (**self).bind_profile(profile)
    }

    fn update(&self, account: &Account) -> Result<(), AccountStoreError> {
        (**self).update(account)
    }

    fn validate_token(
        &self,
        purpose: TokenPurpose,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        (**self).validate_token(purpose, token, now)
    }

    fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        (**self).consume_verification_token(token, now)
    }

    fn consume_reset_token(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountStoreError> {
        (**self).consume_reset_token(token, new_password, now)
    }
}
