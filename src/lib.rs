//! chirpd — a minimal HTTP file server with CORS support and a
//! visit-counter admin surface.
//!
//! Request flow: CORS envelope → route table → (hit counter → static
//! assets) | admin handlers | catch-all 404.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;
