//! Gateway Configuration
//!
//! Listener address, backing service/app names and CORS settings.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Backing service to connect to (default: "memory")
    #[serde(default = "default_service")]
    pub service: String,

    /// App inside the service; created at startup if missing
    #[serde(default = "default_app")]
    pub app: String,

    /// CORS allowed origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_service() -> String {
    crate::store::MEMORY_SERVICE.to_string()
}

fn default_app() -> String {
    "rowgate".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service: default_service(),
            app: default_app(),
            cors_origins: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Apply a `host:port` listen address. An empty host (`:8080`) keeps
    /// the configured host.
    pub fn set_addr(&mut self, addr: &str) -> Result<(), String> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| format!("Invalid listen address '{}': expected host:port", addr))?;
        let port: u16 = port
            .parse()
            .map_err(|_| format!("Invalid port in listen address '{}'", addr))?;

        if !host.is_empty() {
            self.host = host.trim_start_matches('[').trim_end_matches(']').to_string();
        }
        self.port = port;
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.app.is_empty() {
            return Err("app name must not be empty".to_string());
        }
        self.socket_addr()
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.socket_addr(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.service, "memory");
        assert_eq!(config.app, "rowgate");
        assert!(config.cors_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = GatewayConfig::with_port(9090);
        assert_eq!(config.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_set_addr() {
        let mut config = GatewayConfig::default();
        config.set_addr(":9000").unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");

        config.set_addr("127.0.0.1:7000").unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:7000");

        config.set_addr("[::1]:7001").unwrap();
        assert_eq!(config.socket_addr(), "[::1]:7001");
        assert!(config.validate().is_ok());

        assert!(config.set_addr("localhost").is_err());
        assert!(config.set_addr("localhost:http").is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GatewayConfig = serde_json::from_str(r#"{"app": "notes"}"#).unwrap();
        assert_eq!(config.app, "notes");
        assert_eq!(config.port, 8080);
        assert_eq!(config.service, "memory");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GatewayConfig::default();
        config.app = String::new();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }
}
