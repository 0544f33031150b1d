use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use webprefs::config::Settings;
use webprefs::error::{PrefsError, Result};
use webprefs::server;

#[tokio::main]
async fn main() -> Result<()> {
    // the first argument names the settings file, without extension
    let config_name = std::env::args().nth(1);
    let settings = Settings::load(config_name.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let interface = Arc::new(webprefs::standalone(&settings)?);
    let shutdown = Arc::new(Notify::new());
    let app = server::router(interface, Arc::clone(&shutdown));

    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "preferences API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(|e| {
            error!(error = %e, "server stopped unexpectedly");
            PrefsError::Io(e.to_string())
        })?;
    info!("server stopped");
    Ok(())
}

async fn wait_for_shutdown(requested: Arc<Notify>) {
    tokio::select! {
        _ = requested.notified() => info!("shutdown requested"),
        _ = tokio::signal::ctrl_c() => info!("Ctrl+C detected"),
    }
}
