use std::sync::Arc;

use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::{Credentials, Mechanism},
    Address, Message, SmtpTransport, Transport,
};
use tracing::info;

use crate::config::SmtpConfig;
use crate::models::ContactMessage;

pub const SUBJECT_PREFIX: &str = "Portfolio Contact: ";
const SENDER_NAME: &str = "Portfolio Contact Form";
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Transport(String),

    #[error("mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl MailError {
    /// True when the visitor's input caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MailError::MissingField(_) | MailError::InvalidAddress { .. })
    }
}

/// Submits a finished message. Implementations block the calling thread.
pub trait MailTransport: Send + Sync {
    fn send(&self, email: &Message) -> Result<(), MailError>;
}

impl MailTransport for SmtpTransport {
    fn send(&self, email: &Message) -> Result<(), MailError> {
        Transport::send(self, email)
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// SMTP is not configured; nothing was sent.
    Skipped,
}

#[derive(Clone)]
struct Outbound {
    sender: Address,
    transport: Arc<dyn MailTransport>,
}

/// Relays contact form submissions to the site owner.
#[derive(Clone)]
pub struct Mailer {
    outbound: Option<Outbound>,
}

impl Mailer {
    pub fn disabled() -> Self {
        Mailer { outbound: None }
    }

    pub fn with_transport(sender: Address, transport: Arc<dyn MailTransport>) -> Self {
        Mailer {
            outbound: Some(Outbound { sender, transport }),
        }
    }

    /// Builds an SMTP relay with PLAIN auth. Port 465 uses implicit TLS,
    /// anything else STARTTLS.
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, MailError> {
        let Some(smtp) = smtp else {
            return Ok(Self::disabled());
        };
        let sender = parse_address(&smtp.email)?;
        let builder = if smtp.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&smtp.host)
        } else {
            SmtpTransport::starttls_relay(&smtp.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(smtp.email.clone(), smtp.password.clone()))
            .authentication(vec![Mechanism::Plain])
            .build();
        Ok(Self::with_transport(sender, Arc::new(transport)))
    }

    pub fn is_enabled(&self) -> bool {
        self.outbound.is_some()
    }

    pub async fn deliver(&self, contact: &ContactMessage) -> Result<Delivery, MailError> {
        validate(contact)?;
        let Some(outbound) = &self.outbound else {
            info!("SMTP credentials not set, skipping email send");
            return Ok(Delivery::Skipped);
        };

        let email = compose(&outbound.sender, contact)?;
        let transport = Arc::clone(&outbound.transport);
        tokio::task::spawn_blocking(move || transport.send(&email)).await??;

        info!(to = %outbound.sender, "Email sent successfully");
        Ok(Delivery::Sent)
    }
}

fn validate(contact: &ContactMessage) -> Result<(), MailError> {
    if contact.email.trim().is_empty() {
        return Err(MailError::MissingField("email"));
    }
    if contact.message.trim().is_empty() {
        return Err(MailError::MissingField("message"));
    }
    Ok(())
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address.parse().map_err(|source| MailError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

/// Mail goes from the owner to the owner; the visitor is only reachable
/// through Reply-To.
pub fn compose(sender: &Address, contact: &ContactMessage) -> Result<Message, MailError> {
    let visitor = contact.email.trim();
    let reply_to = parse_address(visitor)?;
    let subject: String = contact
        .subject
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let body = format!(
        "You received a new message from your portfolio contact form.\n\nFrom: {}\n\nMessage:\n{}",
        visitor, contact.message
    );

    let email = Message::builder()
        .from(Mailbox::new(Some(SENDER_NAME.to_string()), sender.clone()))
        .to(Mailbox::new(None, sender.clone()))
        .reply_to(Mailbox::new(None, reply_to))
        .subject(format!("{}{}", SUBJECT_PREFIX, subject))
        .header(ContentType::TEXT_PLAIN)
        .body(body)?;
    Ok(email)
}
