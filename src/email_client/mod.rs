//! Outbound email delivery.
//!
//! Handlers only see [`EmailTransport`]; which strategy backs it is picked
//! from `email_client.transport` in the configuration.

mod brevo;
mod smtp;

use async_trait::async_trait;
use std::sync::Arc;

pub use brevo::BrevoEmailClient;
pub use smtp::SmtpEmailClient;

use crate::config::{EmailClientSettings, TransportKind};
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(thiserror::Error, Debug)]
pub enum EmailClientError {
    #[error("Invalid sender email: {0}")]
    InvalidSender(String),
    #[error("Brevo request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to build the email message: {0}")]
    Message(String),
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Short label reported on the health endpoint.
    fn name(&self) -> &'static str;

    /// Whether credentials are present to actually deliver email.
    fn is_configured(&self) -> bool;

    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailClientError>;
}

pub fn build_email_transport(
    settings: &EmailClientSettings,
) -> Result<Arc<dyn EmailTransport>, EmailClientError> {
    let sender = settings
        .get_sender_email()
        .map_err(EmailClientError::InvalidSender)?;

    let transport: Arc<dyn EmailTransport> = match settings.transport {
        TransportKind::Brevo => Arc::new(BrevoEmailClient::new(
            settings.brevo.base_url.clone(),
            sender,
            settings.sender_name.clone(),
            settings.brevo.api_key.clone(),
            Some(settings.get_timeout()),
        )?),
        TransportKind::Smtp => Arc::new(SmtpEmailClient::new(
            &settings.smtp,
            sender,
            settings.sender_name.clone(),
            settings.get_timeout(),
        )?),
    };

    tracing::info!(
        transport = transport.name(),
        configured = transport.is_configured(),
        "Email transport ready"
    );

    Ok(transport)
}
