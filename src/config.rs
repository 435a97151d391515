use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const DEFAULT_NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone)]
pub struct Config {
    pub notion_api_key: Option<String>,
    pub bind_addr: String,
    pub bind_port: u16,
    pub keepalive_interval: Duration,
    pub backend_timeout: Duration,
    pub notion_api_base_url: String,
    pub notion_version: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("SSE_KEEPALIVE_SECS must be a positive integer")]
    InvalidKeepAlive,
    #[error("BACKEND_TIMEOUT_SECS must be a positive integer")]
    InvalidBackendTimeout,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let notion_api_key = var("NOTION_API_KEY").or_else(|| var("NOTION_KEY"));
        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let keepalive_interval =
            parse_positive_secs(var("SSE_KEEPALIVE_SECS"), 10, ConfigError::InvalidKeepAlive)?;
        let backend_timeout = parse_positive_secs(
            var("BACKEND_TIMEOUT_SECS"),
            30,
            ConfigError::InvalidBackendTimeout,
        )?;
        let notion_api_base_url = var("NOTION_API_BASE_URL")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_NOTION_API_BASE_URL.to_string());
        let notion_version =
            var("NOTION_VERSION").unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());

        let config = Self {
            notion_api_key,
            bind_addr,
            bind_port,
            keepalive_interval,
            backend_timeout,
            notion_api_base_url,
            notion_version,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn parse_positive_secs(
    value: Option<String>,
    default_secs: u64,
    error: ConfigError,
) -> Result<Duration, ConfigError> {
    let Some(value) = value else {
        return Ok(Duration::from_secs(default_secs));
    };

    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(error),
    }
}
