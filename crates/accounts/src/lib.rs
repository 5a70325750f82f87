//! `connectcargo-accounts` — credential store, token issuer, and session gate.
//!
//! Pure domain: no IO, no clocks (callers pass `now`), no storage. The
//! persistence, mail, and session collaborators live in `connectcargo-infra`.

pub mod account;
pub mod email;
pub mod error;
pub mod gate;
pub mod password;
pub mod token;

pub use account::{Account, AccountRole, AccountStatus, ContactInfo, LOCKOUT_THRESHOLD};
pub use email::Email;
pub use error::AuthError;
pub use gate::{AccessDenied, SessionActor, authorize, ensure_active};
pub use password::PasswordHash;
pub use token::{IssuedToken, TokenPurpose};
