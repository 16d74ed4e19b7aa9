use salon_desk::{notifier, router, store, AppState, Config};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let mut data = match store::open(&config.data_path).await {
        Ok(data) => data,
        Err(err) => {
            error!("failed to open store: {err}");
            std::process::exit(1);
        }
    };

    if data.seed_services_if_empty(&config.seed_services) {
        store::persist(&config.data_path, &data).await?;
        info!(count = config.seed_services.len(), "seeded services");
    }

    let port = config.port;
    let notify_every = config.notify_interval;
    let state = AppState::new(config, data);
    notifier::spawn(state.clone(), notify_every);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
