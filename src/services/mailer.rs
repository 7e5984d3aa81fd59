//! Outbound email transports.
//!
//! Production sends over SMTP via lettre. Every other environment uses the
//! simulated transport, which only logs and records what would have been sent.

use async_trait::async_trait;
use chrono::Utc;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::{AppConfig, EmailConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `message`, returning a transport-specific delivery id
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError>;
}

/// Pick the transport for this configuration
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match (&config.email.smtp_host, config.environment.is_production()) {
        (Some(_), true) => Ok(Arc::new(SmtpMailer::new(&config.email)?)),
        (None, true) => {
            tracing::warn!("SMTP_HOST not set in production, email notifications will only be logged");
            Ok(Arc::new(SimulatedMailer::new()))
        }
        _ => Ok(Arc::new(SimulatedMailer::new())),
    }
}

/// SMTP delivery over a STARTTLS relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| MailError::InvalidAddress("SMTP host is not configured".to_string()))?;

        let credentials = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let address = config
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(message
                .to
                .parse()
                .map_err(|_| MailError::InvalidAddress(message.to.clone()))?)
            .subject(message.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            )?;

        let response = self.transport.send(email).await?;

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent successfully");
        Ok(response.code().to_string())
    }
}

/// Outbox size kept by the simulated transport
pub const SIMULATED_OUTBOX_CAPACITY: usize = 100;

/// Logs messages instead of sending them and keeps the most recent ones for inspection
pub struct SimulatedMailer {
    outbox: Mutex<VecDeque<EmailMessage>>,
    capacity: usize,
}

impl Default for SimulatedMailer {
    fn default() -> Self {
        Self::with_capacity(SIMULATED_OUTBOX_CAPACITY)
    }
}

impl SimulatedMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outbox: Mutex::new(VecDeque::with_capacity(capacity.min(SIMULATED_OUTBOX_CAPACITY))),
            capacity: capacity.max(1),
        }
    }

    /// Most recent messages "sent", oldest first
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for SimulatedMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let id = format!("simulated-{}", Utc::now().timestamp_millis());
        tracing::info!(to = %message.to, subject = %message.subject, id = %id, "Simulated email send");

        let mut outbox = self.outbox.lock().unwrap_or_else(|e| e.into_inner());
        if outbox.len() >= self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(message.clone());
        Ok(id)
    }
}
