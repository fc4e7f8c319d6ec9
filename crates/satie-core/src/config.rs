// src/config.rs
use serde::Deserialize;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen host (default: 127.0.0.1)
    pub host: String,

    /// Listen port (default: 8000)
    pub port: u16,

    /// Worker thread count (default: one per CPU)
    pub workers: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables (with .env support).
    ///
    /// Reads `SATIE_HOST`, `SATIE_PORT` and `SATIE_WORKERS`; every field
    /// falls back to its default when unset or unparseable.
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        ServerConfig {
            host: std::env::var("SATIE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("SATIE_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            workers: std::env::var("SATIE_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(num_cpus::get),
        }
    }

    /// `host:port`, ready for `Server::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            workers: num_cpus::get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:8000");
        assert!(config.workers >= 1);
    }
}
