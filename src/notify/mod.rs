//! Notification module for Listing Watch
//!
//! This module formats match notifications and hands them to a mail
//! transport. Delivery is best effort: failures are logged, never retried
//! within a cycle and never abort it.

mod smtp;

pub use smtp::{build_message, SmtpTransport};

use crate::listing::{ListingRecord, SearchCriterion};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while sending a notification
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid mail address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Send timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// A fully formed outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for mail transport implementations
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempts delivery of one message
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError>;
}

/// Sends notifications from a fixed sender identity
#[derive(Clone)]
pub struct Notifier {
    sender: String,
    transport: Arc<dyn MailTransport>,
    send_timeout: Duration,
}

impl Notifier {
    /// Creates a notifier
    ///
    /// # Arguments
    ///
    /// * `sender` - Sender identity, e.g. `"Listing Watch <watch@example.com>"`
    /// * `transport` - The mail transport collaborator
    /// * `send_timeout` - Upper bound on a single send
    pub fn new(sender: impl Into<String>, transport: Arc<dyn MailTransport>, send_timeout: Duration) -> Self {
        Self {
            sender: sender.into(),
            transport,
            send_timeout,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Sends one message, logging and swallowing any failure
    ///
    /// # Returns
    ///
    /// `true` if the transport accepted the message
    pub async fn notify(&self, recipient: &str, subject: &str, body: &str) -> bool {
        let envelope = Envelope {
            from: self.sender.clone(),
            to: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };

        match self.send_with_timeout(&envelope).await {
            Ok(()) => {
                tracing::info!("Sent notification '{}' from {} to {}", subject, self.sender, recipient);
                true
            }
            Err(e) => {
                tracing::error!("Error sending notification '{}' to {}: {}", subject, recipient, e);
                false
            }
        }
    }

    async fn send_with_timeout(&self, envelope: &Envelope) -> Result<(), TransportError> {
        match tokio::time::timeout(self.send_timeout, self.transport.send(envelope)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                seconds: self.send_timeout.as_secs(),
            }),
        }
    }
}

/// Formats the subject and body announcing a newly matched listing
///
/// The subject is the listing id. Unknown values are printed as `n/a`.
pub fn match_message(listing: &ListingRecord, criterion: &SearchCriterion) -> (String, String) {
    let body = format!(
        "ID: {}\nMake: {}\nModel: {}\nYear: {}\nLink: {}",
        listing.id,
        criterion.make,
        criterion.model,
        listing.year_or_unknown(),
        listing.url_or_unknown()
    );
    (listing.id.clone(), body)
}
