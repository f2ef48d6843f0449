use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use super::{error_chain_fmt, error_response};
use crate::domain::approval_email::{ApprovalEmail, ApprovalEmailBody};
use crate::email_client::{EmailClientError, EmailTransport};

#[derive(thiserror::Error)]
pub enum ApprovalEmailError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to send email")]
    SendEmailError(#[source] EmailClientError),
}

impl std::fmt::Debug for ApprovalEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApprovalEmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApprovalEmailError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApprovalEmailError::SendEmailError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    name = "Sending an approval email",
    skip(body, email_client),
    fields(recipient = ?body.to, subject = ?body.subject)
)]
pub async fn send_approval_email(
    body: web::Json<ApprovalEmailBody>,
    email_client: web::Data<dyn EmailTransport>,
) -> Result<HttpResponse, ApprovalEmailError> {
    let email: ApprovalEmail = body
        .into_inner()
        .try_into()
        .map_err(ApprovalEmailError::ValidationError)?;

    email_client
        .send_email(&email.to, &email.subject, &email.html)
        .await
        .map_err(|err| {
            tracing::error!("Failed to send an email to {}: {:?}", email.to, err);
            ApprovalEmailError::SendEmailError(err)
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
