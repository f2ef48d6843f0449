use actix_cors::Cors;
use actix_web::dev::{Server, ServerHandle};
use actix_web::http::StatusCode;
use actix_web::{error, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings, SiteSettings};
use crate::email_client::{build_email_transport, EmailTransport};
use crate::mailing_list::{MailingListStore, PgMailingList};
use crate::routes::{
    error_response, health_check, ping, send_approval_email, send_poem_announcement,
    send_welcome_email, unsubscribe,
};

/// Name reported by the health endpoint.
pub struct ServiceName(pub String);

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);

        Self::build_with_mailing_list(config, Arc::new(PgMailingList::new(db_pool))).await
    }

    /// Same as [`Application::build`] but with the mailing list supplied by the caller.
    pub async fn build_with_mailing_list(
        config: Settings,
        mailing_list: Arc<dyn MailingListStore>,
    ) -> Result<Self, std::io::Error> {
        let email_transport = build_email_transport(&config.email_client)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            email_transport,
            mailing_list,
            config.site.clone(),
            config.application.service_name.clone(),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn server_handle(&self) -> ServerHandle {
        self.server.handle()
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    email_transport: Arc<dyn EmailTransport>,
    mailing_list: Arc<dyn MailingListStore>,
    site: SiteSettings,
    service_name: String,
) -> Result<Server, std::io::Error> {
    let email_transport: web::Data<dyn EmailTransport> = web::Data::from(email_transport);
    let mailing_list: web::Data<dyn MailingListStore> = web::Data::from(mailing_list);
    let site = web::Data::new(site);
    let service_name = web::Data::new(ServiceName(service_name));

    let server = HttpServer::new(move || {
        // Malformed JSON gets the same {"error": ...} body as validation failures
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let response = error_response(StatusCode::BAD_REQUEST, err.to_string());
            error::InternalError::from_response(err, response).into()
        });

        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(json_config)
            .route("/health", web::get().to(health_check))
            .route("/ping", web::get().to(ping))
            .service(
                web::scope("/api")
                    .route("/send-aproval-email", web::post().to(send_approval_email))
                    .route("/send-welcome-email", web::post().to(send_welcome_email))
                    .route(
                        "/send-poem-announcement",
                        web::post().to(send_poem_announcement),
                    )
                    .route("/unsubscribe", web::post().to(unsubscribe)),
            )
            .app_data(email_transport.clone())
            .app_data(mailing_list.clone())
            .app_data(site.clone())
            .app_data(service_name.clone())
    })
    // Shutdown is driven by the binary so the keep-alive loop stops first
    .disable_signals()
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
