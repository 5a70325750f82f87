//! Mail delivery port.
//!
//! The core does not depend on delivery for the correctness of committed
//! state, but the strict registration flow aborts when the verification
//! message cannot be handed off.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use connectcargo_accounts::{Email, TokenPurpose};

/// A message handed to the delivery collaborator. The `link` embeds the
/// issued token (`{base_url}/auth/verify-email/{token}` and the reset
/// equivalent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: Email,
    pub purpose: TokenPurpose,
    pub link: String,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MailerError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Mail delivery port.
pub trait Mailer: Send + Sync {
    fn deliver(&self, mail: OutboundMail) -> Result<(), MailerError>;
}

/// In-memory outbox for dev/tests.
///
/// `fail_deliveries(true)` makes every delivery fail, which is how the
/// strict-registration rollback path is exercised.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    outbox: Mutex<Vec<OutboundMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn outbox(&self) -> Vec<OutboundMail> {
        self.outbox.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<OutboundMail> {
        self.outbox.lock().unwrap().last().cloned()
    }
}

impl Mailer for RecordingMailer {
    fn deliver(&self, mail: OutboundMail) -> Result<(), MailerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailerError::Delivery("induced outage".to_string()));
        }
        self.outbox.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Dev-server mailer: logs the delivery instead of sending it, so the
/// verification link is readable from the process output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn deliver(&self, mail: OutboundMail) -> Result<(), MailerError> {
        tracing::info!(to = %mail.to, purpose = %mail.purpose, link = %mail.link, "outbound mail");
        Ok(())
    }
}

impl<T: Mailer + ?Sized> Mailer for Arc<T> {
    fn deliver(&self, mail: OutboundMail) -> Result<(), MailerError> {
        (**self).deliver(mail)
    }
}
