//! Configuration management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Entity tagger configuration
    pub tagger: TaggerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Tagger
        if let Ok(provider) = std::env::var("TAGGER_PROVIDER") {
            config.tagger.provider = provider.parse()?;
        }
        if let Ok(endpoint) = std::env::var("NER_ENDPOINT") {
            config.tagger.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("NER_MODEL") {
            config.tagger.model = model;
        }
        if let Ok(threshold) = std::env::var("NER_MIN_CONFIDENCE") {
            config.tagger.min_confidence =
                threshold.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "NER_MIN_CONFIDENCE".to_string(),
                    value: threshold,
                })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum upload size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 60,
            max_body_size: 2 * 1024 * 1024, // 2MB, transcripts are small
            cors_enabled: true,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Entity tagger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Which tagger implementation to use
    pub provider: TaggerProvider,

    /// Inference endpoint URL (remote provider only)
    pub endpoint: String,

    /// Model identifier sent to the inference endpoint
    pub model: String,

    /// Drop remote entities below this confidence
    pub min_confidence: f32,

    /// Request timeout in seconds (remote provider only)
    pub timeout_secs: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            provider: TaggerProvider::Rule,
            endpoint: "http://localhost:8090".to_string(),
            model: "dbmdz/bert-large-cased-finetuned-conll03-english".to_string(),
            min_confidence: 0.5,
            timeout_secs: 30,
        }
    }
}

/// Supported tagger providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerProvider {
    /// Built-in regex + dictionary tagger
    Rule,
    /// HTTP NER inference endpoint
    Remote,
}

impl std::str::FromStr for TaggerProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rule" => Ok(Self::Rule),
            "remote" => Ok(Self::Remote),
            _ => Err(ConfigError::InvalidValue {
                key: "TAGGER_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.tagger.provider, TaggerProvider::Rule);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_tagger_provider_parse() {
        assert_eq!("rule".parse::<TaggerProvider>().unwrap(), TaggerProvider::Rule);
        assert_eq!(
            "Remote".parse::<TaggerProvider>().unwrap(),
            TaggerProvider::Remote
        );
        assert!("bert".parse::<TaggerProvider>().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            request_timeout_secs = 30
            max_body_size = 1048576
            cors_enabled = false
            cors_origins = []

            [tagger]
            provider = "remote"
            endpoint = "http://ner:8090"
            model = "custom-ner"
            min_confidence = 0.7
            timeout_secs = 10

            [logging]
            level = "debug"
            json_format = true
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.tagger.provider, TaggerProvider::Remote);
        assert_eq!(config.tagger.model, "custom-ner");
    }
}
