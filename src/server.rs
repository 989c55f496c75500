//! Listener setup and graceful shutdown for the HTTP server.

use axum::Router;
use eyre::WrapErr;
use std::future::Future;
use std::io;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Binds `address` and serves `router` until Ctrl-C is received.
///
/// Call this only once the stores behind `router` are ready.
///
/// # Errors
///
/// Returns an error when the address cannot be bound or the server fails
/// while running.
pub async fn serve(address: &str, router: Router) -> eyre::Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .wrap_err_with(|| format!("failed to bind {address}"))?;
    info!(%address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .wrap_err("server failed")?;
    info!("server stopped");
    Ok(())
}

/// Resolves when `signal` fires.
///
/// A signal handler that cannot be installed never resolves, leaving the
/// server running until the process is killed.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>> + Send,
{
    if let Err(err) = signal.await {
        warn!(error = %err, "failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
}
