// Logging utilities
// Plain stdout/stderr logging with bracketed tags, toggled by config.

use std::net::SocketAddr;

use chrono::Local;
use hyper::{Method, Uri, Version};

use crate::config::Config;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("chirpd started successfully");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    println!(
        "Site root: {} (under {})",
        config.routes.app_dir, config.routes.app_prefix
    );
    println!(
        "Assets dir: {} (under {})",
        config.routes.assets_dir, config.routes.assets_prefix
    );
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("[{ts}] [Request] {method} {uri} {version:?}");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

pub fn log_response(status: u16, size: usize) {
    println!("[Response] {status} ({size} bytes)");
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    println!("[API] {method} {path} - {status}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}
