use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::email::{
    EmailError, EmailMessage, EmailSender, MailerFactory, SendEmail, SenderCredentials,
};

#[derive(Clone, Debug)]
pub struct SentMessage {
    pub destination: String,
    pub subject: String,
    pub body: String,
}

/// Records everything it is asked to send. Destinations registered with
/// `fail_for` are refused, which lets tests exercise per-target failure
/// handling.
#[derive(Default)]
pub struct MockSender {
    sent: Mutex<Vec<SentMessage>>,
    failing_destinations: Mutex<HashSet<String>>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, destination: &str) {
        self.failing_destinations
            .lock()
            .expect("MockSender lock poisoned")
            .insert(String::from(destination));
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .expect("MockSender lock poisoned")
            .clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("MockSender lock poisoned").len()
    }
}

#[async_trait]
impl SendEmail for MockSender {
    async fn send<'a>(&self, message: EmailMessage<'a>) -> Result<(), EmailError> {
        let refused = self
            .failing_destinations
            .lock()
            .expect("MockSender lock poisoned")
            .contains(message.destination);

        if refused {
            return Err(EmailError::Refused(format!(
                "mock refusal for {}",
                message.destination
            )));
        }

        log::debug!(
            "MockSender accepted \"{}\" for {}",
            message.subject,
            message.destination
        );

        self.sent
            .lock()
            .expect("MockSender lock poisoned")
            .push(SentMessage {
                destination: String::from(message.destination),
                subject: String::from(message.subject),
                body: message.body,
            });

        Ok(())
    }
}

/// Hands out the same shared `MockSender` regardless of credentials, for
/// tests and for deployments with email disabled.
#[derive(Clone, Default)]
pub struct MockMailerFactory {
    sender: Arc<MockSender>,
}

impl MockMailerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(sender: Arc<MockSender>) -> Self {
        Self { sender }
    }

    pub fn sender(&self) -> Arc<MockSender> {
        Arc::clone(&self.sender)
    }
}

impl MailerFactory for MockMailerFactory {
    fn mailer_for(&self, _credentials: &SenderCredentials) -> Result<EmailSender, EmailError> {
        Ok(Arc::clone(&self.sender) as EmailSender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailbox() -> lettre::message::Mailbox {
        "Test Sender <sender@example.com>".parse().unwrap()
    }

    #[tokio::test]
    async fn test_mock_sender_records_messages() {
        let sender = MockSender::new();

        sender
            .send(EmailMessage {
                body: String::from("<p>hello</p>"),
                subject: "A subject",
                from: mailbox(),
                destination: "target@example.com",
                is_html: true,
            })
            .await
            .unwrap();

        let sent = sender.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, "target@example.com");
        assert_eq!(sent[0].subject, "A subject");
        assert_eq!(sent[0].body, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_mock_sender_failure_injection() {
        let sender = MockSender::new();
        sender.fail_for("refused@example.com");

        let result = sender
            .send(EmailMessage {
                body: String::new(),
                subject: "s",
                from: mailbox(),
                destination: "refused@example.com",
                is_html: false,
            })
            .await;

        assert!(matches!(result, Err(EmailError::Refused(_))));
        assert_eq!(sender.sent_count(), 0);

        sender
            .send(EmailMessage {
                body: String::new(),
                subject: "s",
                from: mailbox(),
                destination: "other@example.com",
                is_html: false,
            })
            .await
            .unwrap();

        assert_eq!(sender.sent_count(), 1);
    }

    #[test]
    fn test_mock_factory_shares_one_sender() {
        let factory = MockMailerFactory::new();
        let credentials = SenderCredentials {
            address: String::from("a@example.com"),
            secret: String::from("secret"),
        };

        let _mailer = factory.mailer_for(&credentials).unwrap();
        assert_eq!(factory.sender().sent_count(), 0);
    }
}
