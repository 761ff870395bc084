//! Ctrl+C / SIGTERM handling for unbounded runs

use std::future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use mineguard_types::Result;
use tokio::runtime::Builder;
use tokio::signal;
use tracing::{info, warn};

/// Set `stop` when the process is asked to terminate.
///
/// The simulation checks the flag between ticks, so the tick in progress
/// always completes.
pub fn watch(stop: Arc<AtomicBool>) -> Result<()> {
    let runtime = Builder::new_current_thread().enable_all().build()?;

    thread::Builder::new()
        .name("shutdown-signal".into())
        .spawn(move || {
            runtime.block_on(shutdown_signal());
            info!("Shutdown signal received, finishing current tick");
            stop.store(true, Ordering::Relaxed);
        })?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
