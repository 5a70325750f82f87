//! User-facing authentication/registration error taxonomy.

use thiserror::Error;

use crate::gate::AccessDenied;

/// Recoverable, user-facing failures of the account lifecycle flows.
///
/// `InvalidCredentials` deliberately does not distinguish an unknown email
/// from a wrong password (account enumeration). `RegistrationFailed` /
/// `VerificationFailed` hide persistence/mail details from the caller; the
/// specifics are logged where they occur.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The first failing password rule, as a human-readable message.
    #[error("{0}")]
    WeakPassword(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid account role: {0}")]
    InvalidRole(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account locked after too many failed login attempts")]
    LockedOut,

    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("account already has a profile bound")]
    ProfileAlreadyBound,

    #[error("{0}")]
    Unauthorized(#[from] AccessDenied),

    #[error("registration failed, please try again")]
    RegistrationFailed,

    #[error("verification failed, please try again")]
    VerificationFailed,
}
