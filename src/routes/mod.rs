mod approval_email;
mod health_check;
mod poem_announcement;
mod unsubscribe;
mod welcome_email;

pub use approval_email::*;
pub use health_check::*;
pub use poem_announcement::*;
pub use unsubscribe::*;
pub use welcome_email::*;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

/// Every failed request is answered with `{"error": "..."}`.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        error: message.into(),
    })
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
