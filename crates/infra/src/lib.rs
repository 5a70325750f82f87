//! `connectcargo-infra` — the injected collaborators of the account core
//! (persistence, mail, sessions) and the service that orchestrates them.
//!
//! Ports are traits; the in-memory implementations here are the dev/test
//! wiring. All of them are initialized once at process start and passed by
//! handle; nothing is looked up through ambient globals.

pub mod account_store;
pub mod mailer;
pub mod service;
pub mod session_store;

pub use account_store::{AccountStore, AccountStoreError, InMemoryAccountStore};
pub use mailer::{Mailer, MailerError, OutboundMail, RecordingMailer, TracingMailer};
pub use service::{AccountService, RegistrationReceipt, RegistrationRequest};
pub use session_store::{InMemorySessionStore, SessionStore};
