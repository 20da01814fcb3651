//! Ctrl+C handling.

/// Completes when the user presses Ctrl+C.
///
/// If the handler cannot be installed this never completes, so callers
/// racing it in `select!` fall through to their other branch.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT");
}
