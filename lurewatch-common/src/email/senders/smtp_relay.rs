use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;

use crate::email::{
    EmailError, EmailMessage, EmailSender, MailerFactory, SendEmail, SenderCredentials,
};

pub struct SmtpRelay {
    smtp_transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    pub fn with_credentials(
        username: &str,
        secret: &str,
        relay_address: &str,
        max_connections: u32,
        idle_timeout: Duration,
    ) -> Result<Self, EmailError> {
        let smtp_transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(relay_address)
            .map_err(|e| EmailError::RelayConnectionFailed(e.to_string()))?
            .credentials(Credentials::new(String::from(username), String::from(secret)))
            .pool_config(
                PoolConfig::new()
                    .max_size(max_connections)
                    .idle_timeout(idle_timeout),
            )
            .build();

        Ok(Self { smtp_transport })
    }

    pub async fn test_connection(&self) -> Result<bool, EmailError> {
        self.smtp_transport
            .test_connection()
            .await
            .map_err(EmailError::FailedToSend)
    }
}

#[async_trait]
impl SendEmail for SmtpRelay {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError> {
        let content_type = if message.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        let email = Message::builder()
            .from(message.from)
            .to(message
                .destination
                .parse()
                .map_err(|_| EmailError::InvalidDestination)?)
            .subject(message.subject)
            .header(content_type)
            .body(message.body)
            .map_err(EmailError::InvalidMessage)?;

        self.smtp_transport
            .send(email)
            .await
            .map_err(EmailError::FailedToSend)?;

        Ok(())
    }
}

pub struct SmtpRelayFactory {
    relay_address: String,
    max_connections: u32,
    idle_timeout: Duration,
}

impl SmtpRelayFactory {
    pub fn new(relay_address: &str, max_connections: u32, idle_timeout: Duration) -> Self {
        Self {
            relay_address: String::from(relay_address),
            max_connections,
            idle_timeout,
        }
    }
}

impl MailerFactory for SmtpRelayFactory {
    fn mailer_for(&self, credentials: &SenderCredentials) -> Result<EmailSender, EmailError> {
        let relay = SmtpRelay::with_credentials(
            &credentials.address,
            &credentials.secret,
            &self.relay_address,
            self.max_connections,
            self.idle_timeout,
        )?;

        Ok(Arc::new(relay))
    }
}
