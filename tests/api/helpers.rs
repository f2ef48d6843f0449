use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::Response;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wiremock::MockServer;

use poem_mailer::{
    config::{get_configuration, Settings, TransportKind},
    domain::{mailing_list_entry::MailingListEntry, subscriber_email::SubscriberEmail},
    mailing_list::{MailingListError, MailingListStore},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

// Logs are only printed when TEST_LOG is set, e.g. `TEST_LOG=true cargo test`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = String::from("info");
    let subscriber_name = String::from("test");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Mailing list kept in memory so the API can be exercised without Postgres.
#[derive(Default)]
pub struct InMemoryMailingList {
    entries: Mutex<Vec<MailingListEntry>>,
    failing: AtomicBool,
}

impl InMemoryMailingList {
    /// Every later call answers like a database that stopped responding.
    pub fn fail_requests(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), MailingListError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailingListError(sqlx::Error::PoolTimedOut));
        }

        Ok(())
    }

    pub fn entries(&self) -> Vec<MailingListEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn entries_for(&self, email: &str) -> Vec<MailingListEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.email == email)
            .collect()
    }

    /// Stores an entry without any duplicate check, like rows left over
    /// from older deployments.
    pub fn seed(&self, email: &str, name: &str, subscribed: bool) {
        self.entries.lock().unwrap().push(MailingListEntry {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            subscribed,
            created: Utc::now(),
            unsubscribed_at: None,
        });
    }
}

#[async_trait]
impl MailingListStore for InMemoryMailingList {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<MailingListEntry>, MailingListError> {
        self.check_available()?;
        Ok(self.entries_for(email.as_ref()).into_iter().next())
    }

    async fn insert(
        &self,
        email: &SubscriberEmail,
        name: &str,
    ) -> Result<MailingListEntry, MailingListError> {
        self.check_available()?;
        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.iter_mut().find(|entry| entry.email == email.as_ref()) {
            entry.subscribed = true;
            return Ok(entry.clone());
        }

        let entry = MailingListEntry {
            id: Uuid::new_v4(),
            email: email.as_ref().to_string(),
            name: name.to_string(),
            subscribed: true,
            created: Utc::now(),
            unsubscribed_at: None,
        };
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn set_subscribed(
        &self,
        email: &SubscriberEmail,
        subscribed: bool,
    ) -> Result<u64, MailingListError> {
        self.check_available()?;
        let mut updated = 0;

        for entry in self
            .entries
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|entry| entry.email == email.as_ref())
        {
            entry.subscribed = subscribed;
            if !subscribed {
                entry.unsubscribed_at = Some(Utc::now());
            }
            updated += 1;
        }

        Ok(updated)
    }
}

/// Email captured by the Brevo mock.
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub email_server: MockServer,
    pub mailing_list: Arc<InMemoryMailingList>,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let email_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());
        config.email_client.transport = TransportKind::Brevo;
        config.email_client.brevo.api_key = secrecy::Secret::new(String::from("test-api-key"));
        config.site.base_url = String::from("https://poems.test");

        let mailing_list = Arc::new(InMemoryMailingList::default());

        let application =
            Application::build_with_mailing_list(config.clone(), mailing_list.clone())
                .await
                .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            email_server,
            mailing_list,
        }
    }

    async fn post_json(&self, endpoint: &str, body: &serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(&format!("{}{}", self.address, endpoint))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_approval_email(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/send-aproval-email", &body).await
    }

    pub async fn post_welcome_email(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/send-welcome-email", &body).await
    }

    pub async fn post_poem_announcement(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/send-poem-announcement", &body).await
    }

    pub async fn post_unsubscribe(&self, body: serde_json::Value) -> Response {
        self.post_json("/api/unsubscribe", &body).await
    }

    pub async fn sent_emails(&self) -> Vec<SentEmail> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| {
                let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();

                SentEmail {
                    to: body["to"][0]["email"].as_str().unwrap().to_string(),
                    subject: body["subject"].as_str().unwrap().to_string(),
                    html: body["htmlContent"].as_str().unwrap().to_string(),
                }
            })
            .collect()
    }
}

pub async fn error_message(response: Response) -> String {
    let body: serde_json::Value = response.json().await.expect("Body is not JSON.");

    body["error"]
        .as_str()
        .expect("Body has no error field.")
        .to_string()
}
