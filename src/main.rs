use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    signal::unix::{SignalKind, signal},
    sync::watch,
};
use tracing_subscriber::EnvFilter;

mod conditional;
mod config;
mod errors;
mod handlers;
mod models;
mod policy;
mod resolve;
mod routes;
mod services;

use services::{
    proxy_service::ProxyService,
    store::{GcsStore, StoreClient},
};

/// In-flight streams get this long to finish once shutdown begins.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;
    tracing::info!(
        host = %cfg.host,
        port = cfg.port,
        bucket = cfg.bucket.as_deref().unwrap_or("<unset>"),
        project_id = cfg.project_id.as_deref().unwrap_or("<unset>"),
        dev_mode = cfg.dev_mode,
        "starting gcs-proxy"
    );

    // --- Sanity-check the content policy table ---
    policy::verify_table()?;

    // --- Initialize the store client ---
    // A missing bucket or failed client build does not abort startup; the
    // server answers proxied requests with a configuration error until the
    // deployment is fixed, and /health keeps reporting liveness.
    let store: Option<Arc<dyn StoreClient>> = match &cfg.bucket {
        Some(bucket) => match GcsStore::new(bucket, cfg.key_file.as_deref()) {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                tracing::warn!(
                    bucket = %bucket,
                    error = %err,
                    "failed to initialize GCS client; serving configuration errors"
                );
                None
            }
        },
        None => {
            tracing::warn!("GCS_BUCKET_NAME not set; serving configuration errors");
            None
        }
    };

    // --- Build router ---
    let service = ProxyService::new(store, cfg.dev_mode);
    let app: Router = routes::routes::routes().with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    // --- Graceful shutdown: stop accepting on signal, drain with a bound ---
    let mut sigterm = signal(SignalKind::terminate())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        tracing::info!("shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });

    let mut graceful_rx = shutdown_rx.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = graceful_rx.changed().await;
    });

    let mut deadline_rx = shutdown_rx;
    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = deadline_rx.changed().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            tracing::warn!("shutdown grace period elapsed, aborting in-flight requests");
        }
    }

    tracing::info!("server shutdown complete");
    Ok(())
}
