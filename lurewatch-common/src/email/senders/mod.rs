mod mock_sender;
mod smtp_relay;

pub use mock_sender::{MockMailerFactory, MockSender, SentMessage};
pub use smtp_relay::{SmtpRelay, SmtpRelayFactory};
