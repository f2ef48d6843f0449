use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time;

use super::{EmailClientError, EmailTransport};
use crate::config::{SmtpSettings, SmtpTls};
use crate::domain::subscriber_email::SubscriberEmail;

/// Delivers email through an authenticated SMTP relay.
pub struct SmtpEmailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    has_credentials: bool,
}

impl SmtpEmailClient {
    pub fn new(
        settings: &SmtpSettings,
        sender: SubscriberEmail,
        sender_name: String,
        timeout: time::Duration,
    ) -> Result<SmtpEmailClient, EmailClientError> {
        let address = sender
            .as_ref()
            .parse()
            .map_err(|_| EmailClientError::InvalidSender(sender.to_string()))?;
        let from = Mailbox::new(Some(sender_name), address);

        let mut builder = match settings.tls {
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpTls::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
        };

        builder = builder.port(settings.port).timeout(Some(timeout));

        let has_credentials = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(Credentials::new(
                    username.clone(),
                    password.expose_secret().clone(),
                ));
                true
            }
            _ => false,
        };

        Ok(SmtpEmailClient {
            transport: builder.build(),
            from,
            has_credentials,
        })
    }

    fn build_message(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<Message, EmailClientError> {
        let to: Mailbox = recipient
            .as_ref()
            .parse()
            .map_err(|err| EmailClientError::Message(format!("{}: {}", recipient, err)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_content.to_string())
            .map_err(|err| EmailClientError::Message(err.to_string()))
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailClient {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn is_configured(&self) -> bool {
        self.has_credentials
    }

    #[tracing::instrument(
        name = "Sending an email through SMTP",
        skip(self, html_content),
        fields(recipient = %recipient, subject = %subject)
    )]
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailClientError> {
        let message = self.build_message(recipient, subject, html_content)?;

        self.transport.send(message).await?;

        Ok(())
    }
}
