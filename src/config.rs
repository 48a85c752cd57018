//! Configuration management for the FraudNet service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Environment variable overriding the config file location.
const CONFIG_PATH_VAR: &str = "FRAUDNET_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static HTML page served at `GET /`
    #[serde(default = "default_frontend_path")]
    pub frontend_path: String,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Path to the phishing URL detection model
    #[serde(default = "default_phishing_path")]
    pub phishing_path: String,
    /// Path to the credit card fraud detection model
    #[serde(default = "default_cc_fraud_path")]
    pub cc_fraud_path: String,
    /// Number of threads for ONNX inference per model (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_frontend_path() -> String {
    "static/index.html".to_string()
}

fn default_phishing_path() -> String {
    "models/phishing_model.onnx".to_string()
}

fn default_cc_fraud_path() -> String {
    "models/cc_fraud_model.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Load configuration from the default or `FRAUDNET_CONFIG` path.
    ///
    /// A missing file is not an error; defaults apply so the service can
    /// start (and report unhealthy model slots) with no configuration at
    /// all. A present-but-malformed file is an error.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config/config.toml".to_string());

        Self::load_or_default(&path)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            models: ModelsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_path: default_frontend_path(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            phishing_path: default_phishing_path(),
            cc_fraud_path: default_cc_fraud_path(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.models.phishing_path, "models/phishing_model.onnx");
        assert_eq!(config.models.cc_fraud_path, "models/cc_fraud_model.onnx");
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        // Loading a missing file explicitly is an error
        let loaded = AppConfig::load_from_path("does/not/exist.toml");
        assert!(loaded.is_err());

        // but the startup path tolerates absence
        let config = AppConfig::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.models.onnx_threads, 1);
    }
}
