mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use xhub_api::auth::{AppState, AppStateInner};
use xhub_api::routes::router;
use xhub_core::{Hub, HubConfig};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xhub=debug,xhub_api=debug,xhub_core=debug,xhub_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = xhub_db::Database::open(&config.db_path)?;

    let mut hub_config = HubConfig::new(config.admin_secret);
    hub_config.mail_subject = config.mail_subject;
    let hub = Hub::new(Arc::new(db), hub_config);

    let state: AppState = Arc::new(AppStateInner { hub });
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("XHUB server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
