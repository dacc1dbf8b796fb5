// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the given file path (without extension).
    /// The file is optional; `CHIRPD_`-prefixed environment variables
    /// override it, and hard defaults fill the rest.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CHIRPD"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "chirpd/0.1")?
            .set_default("http.cors_allow_methods", "POST, GET, OPTIONS, PUT, DELETE")?
            .set_default("http.cors_allow_headers", "*")?
            .set_default("routes.app_prefix", "/app/")?
            .set_default("routes.app_dir", ".")?
            .set_default("routes.assets_prefix", "/assets/")?
            .set_default("routes.assets_dir", "./assets")?
            .set_default("routes.index_files", vec!["index.html", "index.htm"])?
            .build()?;

        settings.try_deserialize()
    }

    /// Load from the default "config.toml" next to the binary.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_config_binds_localhost_8080() {
        let cfg = Config::default();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_host_is_an_error() {
        let mut cfg = Config::default();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
