use crate::parser::MatcherOptions;
use crate::sender::ClientConfig;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Output form of the forwarder's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Dataset the normalized events are ingested into
    #[arg(long, env = "AXIOM_DATASET", default_value = "")]
    pub dataset: String,

    /// Ingest API base URL
    #[arg(long, env = "AXIOM_URL", default_value = "https://api.axiom.co")]
    pub url: String,

    /// API token sent as a bearer credential
    #[arg(long, env = "AXIOM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Organization ID, required for personal tokens
    #[arg(long, env = "AXIOM_ORG_ID")]
    pub org_id: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info", ignore_case = true)]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value = "text", ignore_case = true)]
    pub log_format: LogFormat,

    /// Gzip request bodies
    #[arg(long, env = "ENABLE_COMPRESSION")]
    pub enable_compression: bool,

    /// Ingest request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Levels of nested JSON kept structured (unlimited when unset)
    #[arg(long, env = "JSON_MAX_DEPTH")]
    pub json_max_depth: Option<u8>,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: String::new(),
            url: "https://api.axiom.co".to_string(),
            token: None,
            org_id: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Text,
            enable_compression: false,
            request_timeout_secs: 30,
            json_max_depth: None,
            config_file: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse CLI/env, then swap in the config file when one is named.
    pub fn load<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        if let Some(path) = config.config_file.take() {
            return Self::from_file(path);
        }
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.dataset = self.dataset.trim().to_string();
        self.request_timeout = Duration::from_secs(self.request_timeout_secs);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Dataset must be set (--dataset or AXIOM_DATASET)".to_string(),
            ));
        }

        let url = Url::parse(&self.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Unsupported scheme '{}' in '{}'",
                url.scheme(),
                self.url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.json_max_depth == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "JSON max depth must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            token: self.token.clone(),
            org_id: self.org_id.clone(),
            timeout: self.request_timeout,
            enable_compression: self.enable_compression,
            ..ClientConfig::default()
        }
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            max_json_depth: self.json_max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            dataset: "cloudwatch".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_needs_dataset() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_url_scheme_is_checked() {
        let config = Config {
            url: "ftp://example.com".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let config = Config {
            url: "not a url".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = Config {
            request_timeout_secs: 0,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = Config {
            json_max_depth: Some(0),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_args() {
        let config = Config::from_args([
            "cloudwatch-log-forwarder",
            "--dataset",
            "  logs ",
            "--org-id",
            "acme",
            "--enable-compression",
            "--request-timeout-secs",
            "5",
            "--json-max-depth",
            "2",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.dataset, "logs");
        assert_eq!(config.org_id.as_deref(), Some("acme"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.matcher_options().max_json_depth, Some(2));

        let client = config.client_config();
        assert!(client.enable_compression);
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.org_id.as_deref(), Some("acme"));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }
}
