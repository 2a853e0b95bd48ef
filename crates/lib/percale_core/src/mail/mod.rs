//! Outbound mail.
//!
//! [`Mailer`] hides the delivery mechanism: SMTP in production, a console
//! banner in development, a recording stub in tests.

pub mod console;
pub mod smtp;

pub use console::ConsoleMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("mail transport error: {0}")]
    Transport(String),
}

pub type MailResult<T> = Result<T, MailError>;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a password reset link to `to`.
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> MailResult<()>;
}
