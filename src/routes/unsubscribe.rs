use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use super::{error_chain_fmt, error_response};
use crate::domain::unsubscription::{UnsubscribeBody, Unsubscription};
use crate::mailing_list::{MailingListError, MailingListStore};

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Email not found in mailing list")]
    NotFound,
    #[error("Failed to unsubscribe")]
    MailingListError(#[from] MailingListError),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UnsubscribeError::NotFound => StatusCode::NOT_FOUND,
            UnsubscribeError::MailingListError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    name = "Unsubscribing from the mailing list",
    skip(body, mailing_list),
    fields(subscriber_email = ?body.email)
)]
pub async fn unsubscribe(
    body: web::Json<UnsubscribeBody>,
    mailing_list: web::Data<dyn MailingListStore>,
) -> Result<HttpResponse, UnsubscribeError> {
    let unsubscription: Unsubscription = body
        .into_inner()
        .try_into()
        .map_err(UnsubscribeError::ValidationError)?;

    if mailing_list
        .find_by_email(&unsubscription.email)
        .await?
        .is_none()
    {
        return Err(UnsubscribeError::NotFound);
    }

    let updated = mailing_list
        .set_subscribed(&unsubscription.email, false)
        .await?;

    tracing::info!(updated, "Unsubscribed {}", unsubscription.email);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "unsubscribed": true })))
}
