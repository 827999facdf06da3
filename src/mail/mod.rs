//! Digest delivery.

mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;

/// A rendered message ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Sends one rendered digest
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Delivery errors; every one of them is fatal to the run
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {message}")]
    Address { address: String, message: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP connection failed: {0}")]
    Connect(String),

    #[error("SMTP send failed: {0}")]
    Send(String),
}
