use poem_mailer::config::get_configuration;
use poem_mailer::keep_alive::KeepAlive;
use poem_mailer::startup::Application;
use poem_mailer::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(
        String::from("poem_mailer"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let application = Application::build(config.clone()).await?;
    let server_handle = application.server_handle();

    tracing::info!("Server listening on {}", config.get_address());

    let mut keep_alive = KeepAlive::new(config.keep_alive.clone(), config.get_environment());
    keep_alive.start();

    let server = tokio::spawn(application.run_until_stop());

    tokio::select! {
        result = server => {
            keep_alive.stop();
            return result.map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    keep_alive.stop();
    server_handle.stop(true).await;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {:?}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {:?}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
