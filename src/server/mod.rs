//! Server runtime module
//!
//! Listener creation, the accept loop, per-connection serving, and signal
//! handling. Concurrency comes from one spawned task per connection.

mod connection;
mod listener;
mod signal;

pub use connection::accept_connection;
pub use listener::create_reusable_listener;
pub use signal::ShutdownSignal;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;
use crate::middleware::Handler;

/// Accept connections until shutdown is requested.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    app: Handler,
    shutdown: Arc<ShutdownSignal>,
) {
    let conn_counter = Arc::new(AtomicUsize::new(0));
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &conn_counter, &app);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            () = shutdown.wait() => {
                println!("[SIGNAL] Accept loop stopped, draining in-flight connections");
                break;
            }
        }
    }
}
