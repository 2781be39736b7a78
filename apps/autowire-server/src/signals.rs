use anyhow::Result;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Cancel `token` on Ctrl+C or SIGTERM.
pub fn spawn_shutdown_waiter(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            tracing::warn!(error = %e, "shutdown: signal waiter failed; falling back to ctrl_c()");
            let _ = signal::ctrl_c().await;
        }
        token.cancel();
    });
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("Received Ctrl+C signal");
        }
        result = wait_sigterm() => {
            result?;
            tracing::info!("Received SIGTERM signal");
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<()> {
    let mut handler = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    handler.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<()> {
    std::future::pending::<Result<()>>().await
}
