// Connection handling module
// Accepts and serves a single TCP connection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::header::{HeaderValue, SERVER};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::logger;
use crate::middleware::Handler;

/// Accept a connection, enforcing the max-connections gate.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    app: &Handler,
) {
    // Increment first, then check, so the gate has no window.
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        Arc::clone(state),
        Arc::clone(conn_counter),
        Arc::clone(app),
    );
}

/// Serve one connection in a spawned task: HTTP/1.1 with keep-alive and a
/// read/write timeout, every request dispatched through the middleware
/// chain.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    app: Handler,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let perf = &state.config.performance;
        let timeout_duration =
            std::time::Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout));

        let mut builder = http1::Builder::new();
        if perf.keep_alive_timeout > 0 {
            builder.keep_alive(true);
        }

        let server_name = HeaderValue::from_str(&state.config.http.server_name)
            .unwrap_or_else(|_| HeaderValue::from_static("chirpd"));
        let service_state = Arc::clone(&state);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let app = Arc::clone(&app);
                let state = Arc::clone(&service_state);
                let server_name = server_name.clone();
                async move {
                    if state.config.logging.access_log {
                        logger::log_request(req.method(), req.uri(), req.version());
                    }
                    logger::log_headers_count(
                        req.headers().len(),
                        state.config.logging.show_headers,
                    );
                    let mut resp = app(req).await;
                    resp.headers_mut().insert(SERVER, server_name);
                    Ok::<_, std::convert::Infallible>(resp)
                }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection timeout after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
