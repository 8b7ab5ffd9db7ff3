//! campus-notify: outbound SMS and email.
//!
//! Each send resolves provider credentials for the school first. The
//! resolver itself never fails; requiring a field is this crate's job,
//! and a missing one ends the send before any network call.

pub mod email;
pub mod error;
pub mod sms;

pub use email::{Email, EmailSender, RESEND_BASE_URL};
pub use error::{NotifyError, NotifyResult};
pub use sms::{SmsSender, ARKESEL_BASE_URL};

/// Provider response plus where the credentials came from.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub provider: &'static str,
    pub used_tenant_credentials: bool,
    pub response: serde_json::Value,
}
