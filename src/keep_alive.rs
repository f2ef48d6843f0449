//! Periodic self-ping that keeps free hosting tiers from idling the process.

use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::{Environment, KeepAliveSettings};

enum KeepAliveState {
    Idle,
    Running(JoinHandle<()>),
}

/// Owns the background ping task. Only one task exists per `KeepAlive`, and
/// dropping it stops the task.
pub struct KeepAlive {
    settings: KeepAliveSettings,
    environment: Environment,
    state: KeepAliveState,
}

impl KeepAlive {
    pub fn new(settings: KeepAliveSettings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
            state: KeepAliveState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, KeepAliveState::Running(_))
    }

    /// Spawns the ping loop in production when a URL is configured.
    /// Returns whether the loop is running afterwards.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return true;
        }

        if self.environment != Environment::Production {
            tracing::info!("Keep-alive disabled outside production");
            return false;
        }

        let base_url = match &self.settings.url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => {
                tracing::info!("Keep-alive disabled, no url configured");
                return false;
            }
        };

        // tokio's interval panics on a zero period
        if self.settings.interval_milliseconds == 0 {
            tracing::error!("Keep-alive disabled, interval_milliseconds must be greater than 0");
            return false;
        }

        let http_client = match Client::builder()
            .timeout(self.settings.get_timeout())
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("Failed to build keep-alive http client: {:?}", err);
                return false;
            }
        };

        let ping_url = format!("{}/ping", base_url);
        tracing::info!(
            url = %ping_url,
            interval_ms = self.settings.interval_milliseconds,
            "Starting keep-alive loop"
        );

        let handle = tokio::spawn(ping_loop(http_client, ping_url, self.settings.clone()));
        self.state = KeepAliveState::Running(handle);

        true
    }

    pub fn stop(&mut self) {
        if let KeepAliveState::Running(handle) =
            std::mem::replace(&mut self.state, KeepAliveState::Idle)
        {
            handle.abort();
            tracing::info!("Keep-alive loop stopped");
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn ping_loop(http_client: Client, ping_url: String, settings: KeepAliveSettings) {
    tokio::time::sleep(settings.get_initial_delay()).await;

    let mut interval = tokio::time::interval(settings.get_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        ping_once(&http_client, &ping_url).await;
    }
}

#[tracing::instrument(name = "Keep-alive ping", skip(http_client))]
async fn ping_once(http_client: &Client, ping_url: &str) {
    let result = http_client
        .get(ping_url)
        .send()
        .await
        .and_then(|response| response.error_for_status());

    match result {
        Ok(response) => tracing::info!(status = %response.status(), "Keep-alive ping succeeded"),
        // A missed ping only means the next one has to do the job
        Err(err) => tracing::warn!(error = ?err, "Keep-alive ping failed"),
    }
}
