//! SMTP mail transport
//!
//! Port 465 uses implicit TLS, any other port upgrades with STARTTLS.

use crate::config::{MailConfig, MailCredentials};
use crate::notify::{Envelope, MailTransport, TransportError};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

const IMPLICIT_TLS_PORT: u16 = 465;

/// Authenticated SMTP relay
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Builds a transport for the configured relay
    ///
    /// No connection is opened until the first send.
    pub fn new(config: &MailConfig, credentials: &MailCredentials) -> Result<Self, TransportError> {
        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let inner = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.pass.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.send_timeout_secs)))
            .build();

        Ok(Self { inner })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let message = build_message(envelope)?;
        self.inner
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

/// Converts an envelope into a plain-text MIME message
pub fn build_message(envelope: &Envelope) -> Result<Message, TransportError> {
    Message::builder()
        .from(parse_mailbox(&envelope.from)?)
        .to(parse_mailbox(&envelope.to)?)
        .subject(envelope.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(envelope.body.clone())
        .map_err(|e| TransportError::Build(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| TransportError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}
