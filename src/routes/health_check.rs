use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;

use crate::email_client::EmailTransport;
use crate::startup::ServiceName;

/// Endpoint used by clients to know if the server is working
#[tracing::instrument(name = "Health Check handler", skip(email_client, service_name))]
pub async fn health_check(
    email_client: web::Data<dyn EmailTransport>,
    service_name: web::Data<ServiceName>,
) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": service_name.0,
        "transport": email_client.name(),
        "transportConfigured": email_client.is_configured(),
        "timestamp": Utc::now(),
    }))
}

/// Target of the keep-alive loop, never touches the transport or the store.
#[tracing::instrument(name = "Ping handler")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "pong",
        "timestamp": Utc::now(),
    }))
}
