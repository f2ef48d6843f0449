use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use futures::future::try_join_all;

use super::{error_chain_fmt, error_response};
use crate::config::SiteSettings;
use crate::domain::poem_announcement::{PoemAnnouncement, PoemAnnouncementBody};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::{EmailClientError, EmailTransport};
use crate::templates;

#[derive(thiserror::Error)]
pub enum PoemAnnouncementError {
    #[error("{0}")]
    ValidationError(String),
    // The caller gets the transport message, so they know why delivery stopped
    #[error("{0}")]
    SendEmailError(#[from] EmailClientError),
}

impl std::fmt::Debug for PoemAnnouncementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PoemAnnouncementError {
    fn status_code(&self) -> StatusCode {
        match self {
            PoemAnnouncementError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PoemAnnouncementError::SendEmailError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    name = "Announcing a new poem",
    skip(body, email_client, site),
    fields(
        poem_title = ?body.poem.as_ref().and_then(|poem| poem.title.as_ref()),
        recipients = body.emails.as_ref().map(Vec::len).unwrap_or_default()
    )
)]
pub async fn send_poem_announcement(
    body: web::Json<PoemAnnouncementBody>,
    email_client: web::Data<dyn EmailTransport>,
    site: web::Data<SiteSettings>,
) -> Result<HttpResponse, PoemAnnouncementError> {
    let announcement: PoemAnnouncement = body
        .into_inner()
        .try_into()
        .map_err(PoemAnnouncementError::ValidationError)?;

    let subject = templates::announcement_subject(&announcement.poem);

    // One email per recipient so each carries its own unsubscribe link
    let deliveries = announcement.recipients.iter().map(|recipient| {
        let html_body = templates::poem_announcement_email(&site, &announcement.poem, recipient);
        deliver(email_client.get_ref(), recipient, &subject, html_body)
    });

    try_join_all(deliveries).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "sent": true,
        "count": announcement.recipients.len(),
    })))
}

async fn deliver(
    email_client: &dyn EmailTransport,
    recipient: &SubscriberEmail,
    subject: &str,
    html_body: String,
) -> Result<(), EmailClientError> {
    email_client
        .send_email(recipient, subject, &html_body)
        .await
        .map_err(|err| {
            tracing::error!(
                "Failed to send a poem announcement to {}: {:?}",
                recipient,
                err
            );
            err
        })
}
