//! Ctrl-C handling
//!
//! The handler is registered when `interrupt` is called, not when the
//! returned future is first polled, so a Ctrl-C that arrives during the
//! banner or preflight is still seen.

use std::future::Future;
use tokio::signal::unix::{SignalKind, signal};

/// Register for SIGINT now; the returned future resolves on the next one.
///
/// Must be called from within a tokio runtime.
pub fn interrupt() -> std::io::Result<impl Future<Output = ()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    log::debug!("Ctrl-C handler installed");

    Ok(async move {
        if sigint.recv().await.is_none() {
            log::warn!("Ctrl-C stream closed");
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl-C");
    })
}
