use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use super::{EmailClientError, EmailTransport};
use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Brevo transactional email API client.
pub struct BrevoEmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    sender_name: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

#[derive(serde::Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(serde::Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

impl BrevoEmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        sender_name: String,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<BrevoEmailClient, EmailClientError> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(BrevoEmailClient {
            http_client,
            base_url,
            sender,
            sender_name,
            api_key,
        })
    }
}

#[async_trait]
impl EmailTransport for BrevoEmailClient {
    fn name(&self) -> &'static str {
        "brevo"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    #[tracing::instrument(
        name = "Sending an email through Brevo",
        skip(self, html_content),
        fields(recipient = %recipient, subject = %subject)
    )]
    async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), EmailClientError> {
        let url = format!("{}/v3/smtp/email", self.base_url);
        let body = SendEmailBody {
            sender: BrevoSender {
                name: &self.sender_name,
                email: self.sender.as_ref(),
            },
            to: vec![BrevoRecipient {
                email: recipient.as_ref(),
            }],
            subject,
            html_content,
        };

        self.http_client
            .post(&url)
            .header("api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}
