use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use super::{error_chain_fmt, error_response};
use crate::config::SiteSettings;
use crate::domain::new_subscriber::{NewSubscriber, WelcomeEmailBody};
use crate::email_client::{EmailClientError, EmailTransport};
use crate::mailing_list::{MailingListError, MailingListStore};
use crate::templates;

#[derive(thiserror::Error)]
pub enum WelcomeEmailError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to send welcome email")]
    SendEmailError(#[source] EmailClientError),
    #[error("Failed to send welcome email")]
    MailingListError(#[from] MailingListError),
}

impl std::fmt::Debug for WelcomeEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WelcomeEmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            WelcomeEmailError::ValidationError(_) => StatusCode::BAD_REQUEST,
            WelcomeEmailError::SendEmailError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WelcomeEmailError::MailingListError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    name = "Sending a welcome email",
    skip(body, email_client, mailing_list, site),
    fields(subscriber_email = ?body.email, subscriber_name = ?body.name)
)]
pub async fn send_welcome_email(
    body: web::Json<WelcomeEmailBody>,
    email_client: web::Data<dyn EmailTransport>,
    mailing_list: web::Data<dyn MailingListStore>,
    site: web::Data<SiteSettings>,
) -> Result<HttpResponse, WelcomeEmailError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(WelcomeEmailError::ValidationError)?;

    let html_body = templates::welcome_email(&site, new_subscriber.name.as_ref());

    email_client
        .send_email(&new_subscriber.email, templates::WELCOME_SUBJECT, &html_body)
        .await
        .map_err(|err| {
            tracing::error!(
                "Failed to send a welcome email to {}: {:?}",
                new_subscriber.email,
                err
            );
            WelcomeEmailError::SendEmailError(err)
        })?;

    add_to_mailing_list(&mailing_list, &new_subscriber).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[tracing::instrument(name = "Adding a subscriber to the mailing list", skip(mailing_list))]
async fn add_to_mailing_list(
    mailing_list: &web::Data<dyn MailingListStore>,
    new_subscriber: &NewSubscriber,
) -> Result<(), MailingListError> {
    match mailing_list.find_by_email(&new_subscriber.email).await? {
        None => {
            let name = new_subscriber
                .name
                .as_ref()
                .map(|name| name.as_ref())
                .unwrap_or_default();
            mailing_list.insert(&new_subscriber.email, name).await?;
        }
        Some(_) => {
            mailing_list
                .set_subscribed(&new_subscriber.email, true)
                .await?;
        }
    }

    Ok(())
}
