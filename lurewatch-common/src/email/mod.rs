pub mod senders;

use async_trait::async_trait;
use lettre::message::Mailbox;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum EmailError {
    RelayConnectionFailed(String),
    InvalidDestination,
    InvalidMessage(lettre::error::Error),
    FailedToSend(lettre::transport::smtp::Error),
    Refused(String),
}

impl std::error::Error for EmailError {}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailError::RelayConnectionFailed(e) => {
                write!(f, "EmailError: Relay connection failed: {e}")
            }
            EmailError::InvalidDestination => write!(f, "EmailError: Invalid destination address"),
            EmailError::InvalidMessage(e) => write!(f, "EmailError: Invalid message: {e}"),
            EmailError::FailedToSend(e) => write!(f, "EmailError: Failed to send: {e}"),
            EmailError::Refused(e) => write!(f, "EmailError: Send refused: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct EmailMessage<'a> {
    pub body: String,
    pub subject: &'a str,
    pub from: Mailbox,
    pub destination: &'a str,
    pub is_html: bool,
}

#[async_trait]
pub trait SendEmail: Send + Sync {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError>;
}

pub type EmailSender = Arc<dyn SendEmail>;

/// Sender identity resolved for one campaign launch. The secret never leaves
/// this process except as SMTP credentials.
#[derive(Clone)]
pub struct SenderCredentials {
    pub address: String,
    pub secret: String,
}

impl fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Builds a mail sender for one campaign's resolved credentials. Sender
/// identity varies per user, so the transport cannot be constructed once at
/// startup.
pub trait MailerFactory: Send + Sync {
    fn mailer_for(&self, credentials: &SenderCredentials) -> Result<EmailSender, EmailError>;
}

pub type MailerFactoryHandle = Arc<Box<dyn MailerFactory>>;
