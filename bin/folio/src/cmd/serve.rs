//! Serve command - run the blog over HTTP

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use folio_content::ContentStore;
use folio_core::{Config, Mode};
use tokio::net::TcpListener;

use crate::server::{AppState, create_router};

/// Run the serve command.
///
/// CLI values override the `[server]` section; `dev` forces development mode.
pub async fn run(
    config_path: &Path,
    host: Option<&str>,
    port: Option<u16>,
    dev: bool,
) -> Result<()> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    let mode = if dev { Mode::Development } else { config.mode() };
    let host = host.unwrap_or(&config.server.host).to_string();
    let port = port.unwrap_or(config.server.port);
    let content_dir = config.content.dir.clone();

    if !content_dir.is_dir() {
        tracing::warn!(dir = %content_dir.display(), "content directory does not exist");
    }

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, ?mode, content = %content_dir.display(), "Serving site");
    println!("  Listening on http://{addr}");

    let state = AppState::new(Arc::new(ContentStore::new(content_dir)), config, mode);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
