// Configuration module entry point
// Layers config file, environment and defaults for the demo server

mod types;

use std::net::SocketAddr;

pub use types::{CacheConfig, Config, LoggingConfig, ServerConfig, StaticFilesConfig};

impl Config {
    /// Load configuration from "config.toml" (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Environment variables use the `CACHE_` prefix with `__` between
    /// section and key, e.g. `CACHE_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CACHE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout", 30)?
            .set_default("static_files.root", "static")?
            .set_default("static_files.index_file", "index.html")?
            .set_default("cache.public", false)?
            .set_default("cache.max_age", 600)?
            .set_default("cache.etag", true)?
            .set_default("cache.weak_etag", false)?
            .set_default("cache.last_modified", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000
        request_timeout = 10

        [static_files]
        root = "public"

        [cache]
        public = true
        max_age = 86400
        etag = true
        last_modified = false

        [logging]
        level = "debug"
        access_log = false
        error_log_file = "logs/error.log"
    "#;

    #[test]
    fn test_deserialize_sample() {
        let cfg: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.static_files.root, "public");
        assert_eq!(cfg.static_files.index_file, "index.html");
        assert_eq!(
            cfg.cache,
            CacheConfig {
                public: true,
                max_age: 86400,
                etag: true,
                weak_etag: false,
                last_modified: false,
            }
        );
        assert_eq!(cfg.logging.error_log_file.as_deref(), Some("logs/error.log"));
        assert_eq!(cfg.logging.access_log_file, None);
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/config").unwrap();
        assert_eq!(cfg.cache.max_age, 600);
        assert!(!cfg.cache.public);
        assert!(cfg.cache.etag);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg: Config = toml::from_str(SAMPLE).unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
