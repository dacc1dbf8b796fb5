// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// HTTP response configuration, including the CORS allow lists the
/// envelope middleware injects into every response.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub cors_allow_methods: String,
    pub cors_allow_headers: String,
}

/// Static route configuration: two directory trees, each served under a
/// URL prefix. The site tree is the one the hit counter wraps.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    pub app_prefix: String,
    pub app_dir: String,
    pub assets_prefix: String,
    pub assets_dir: String,
    pub index_files: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            show_headers: false,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "chirpd/0.1".to_string(),
            cors_allow_methods: "POST, GET, OPTIONS, PUT, DELETE".to_string(),
            cors_allow_headers: "*".to_string(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            app_prefix: "/app/".to_string(),
            app_dir: ".".to_string(),
            assets_prefix: "/assets/".to_string(),
            assets_dir: "./assets".to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }
}
