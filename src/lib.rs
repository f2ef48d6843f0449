pub mod config;
pub mod domain;
pub mod email_client;
pub mod keep_alive;
pub mod mailing_list;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod templates;
