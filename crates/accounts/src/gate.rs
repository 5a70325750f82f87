//! Session gate: status + role authorization for gated sections.

use thiserror::Error;

use connectcargo_core::AccountId;

use crate::account::{Account, AccountRole, AccountStatus};

/// Minimal actor view the gate needs.
///
/// Any representation exposing identity, role, and status satisfies the
/// session contract; handlers are not forced to carry a full [`Account`].
pub trait SessionActor {
    fn account_id(&self) -> AccountId;
    fn role(&self) -> AccountRole;
    fn status(&self) -> AccountStatus;
}

impl SessionActor for Account {
    fn account_id(&self) -> AccountId {
        Account::account_id(self)
    }

    fn role(&self) -> AccountRole {
        Account::role(self)
    }

    fn status(&self) -> AccountStatus {
        Account::status(self)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// No session presented, or the session was revoked/never issued.
    #[error("no active session")]
    NoSession,

    /// Anything other than `Active` is denied, including
    /// `PendingVerification` (email not yet verified).
    #[error("account is not active ({0})")]
    NotActive(AccountStatus),

    /// Role-gated sections are mutually exclusive.
    #[error("this section requires a {required} account")]
    RoleMismatch {
        required: AccountRole,
        actual: AccountRole,
    },
}

/// Authorize an actor for a role-gated section.
///
/// - No IO
/// - No panics
/// - Status is checked before role, so a suspended carrier probing a company
///   section learns only that its account is not active.
pub fn authorize(actor: &impl SessionActor, required: AccountRole) -> Result<(), AccessDenied> {
    ensure_active(actor)?;
    if actor.role() != required {
        return Err(AccessDenied::RoleMismatch {
            required,
            actual: actor.role(),
        });
    }
    Ok(())
}

/// Status-only gate, applied at session establishment (login).
pub fn ensure_active(actor: &impl SessionActor) -> Result<(), AccessDenied> {
    match actor.status() {
        AccountStatus::Active => Ok(()),
        other => Err(AccessDenied::NotActive(other)),
    }
}
