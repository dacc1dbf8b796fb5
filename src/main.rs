use std::sync::Arc;

use chirpd::config::{AppState, Config};
use chirpd::handler::Router;
use chirpd::logger;
use chirpd::middleware::{compose, CorsEnvelope, Middleware};
use chirpd::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Bind failure is the one fatal condition.
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::new(cfg));

    // Route table behind the global middleware chain. The CORS envelope is
    // outermost, so OPTIONS preflights never reach the router; the hit
    // counter is attached to the site route inside the table.
    let router = Arc::new(Router::build(&state)).into_handler();
    let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(CorsEnvelope::new(&state.config.http))];
    let app = compose(&chain, router);

    logger::log_server_start(&addr, &state.config);

    let shutdown = Arc::new(server::ShutdownSignal::new());
    shutdown.listen();

    server::run(listener, state, app, shutdown).await;
    Ok(())
}
