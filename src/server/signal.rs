// Signal handling module
//
// SIGTERM and SIGINT trigger graceful shutdown: the accept loop stops and
// in-flight connections are left to finish.

use std::sync::Arc;

use tokio::sync::Notify;

pub struct ShutdownSignal {
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    /// Resolve once shutdown has been requested.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }

    /// Spawn the background task listening for termination signals.
    pub fn listen(&self) {
        let notify = Arc::clone(&self.notify);
        tokio::spawn(async move {
            shutdown_requested().await;
            println!("[SIGNAL] Shutdown requested");
            notify.notify_waiters();
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn shutdown_requested() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            eprintln!("[SIGNAL] Failed to register SIGTERM handler: {e}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_requested() {
    let _ = tokio::signal::ctrl_c().await;
}
