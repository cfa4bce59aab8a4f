use crate::routes::RouteTable;
use anyhow::{Context, Result};
use clinic_api_client::{BackendLocator, LocatorError, BACKEND_URL_ENV};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen host address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Backend base address; the locator default applies when unset
    pub backend_url: Option<String>,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum inbound body size in bytes
    pub max_body_size_bytes: usize,

    /// JSON route table replacing the built-in clinic routes
    pub routes_file: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend_url: None,
            request_timeout_secs: 10,
            max_body_size_bytes: 1024 * 1024,
            routes_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = std::env::var("GATEWAY_HOST").unwrap_or(defaults.host);
        let port = match std::env::var("GATEWAY_PORT") {
            Ok(value) => value.parse().context("Invalid GATEWAY_PORT")?,
            Err(_) => defaults.port,
        };

        let backend_url = std::env::var(BACKEND_URL_ENV).ok();

        let request_timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(value) => value.parse().context("Invalid REQUEST_TIMEOUT_SECS")?,
            Err(_) => defaults.request_timeout_secs,
        };

        let max_body_size_bytes = match std::env::var("MAX_BODY_SIZE_BYTES") {
            Ok(value) => value.parse().context("Invalid MAX_BODY_SIZE_BYTES")?,
            Err(_) => defaults.max_body_size_bytes,
        };

        let routes_file = std::env::var("ROUTES_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            host,
            port,
            backend_url,
            request_timeout_secs,
            max_body_size_bytes,
            routes_file,
            log_level,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("GATEWAY_HOST cannot be empty");
        }

        self.locator().context("Invalid BACKEND_URL")?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if self.max_body_size_bytes == 0 {
            anyhow::bail!("MAX_BODY_SIZE_BYTES must be greater than 0");
        }

        if let Some(ref path) = self.routes_file {
            if !path.exists() {
                anyhow::bail!("Route file not found: {:?}", path);
            }
        }

        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the listen address
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn locator(&self) -> Result<BackendLocator, LocatorError> {
        BackendLocator::new(self.backend_url.as_deref())
    }

    /// The configured route file, or the built-in clinic table.
    pub fn load_routes(&self) -> Result<RouteTable> {
        match self.routes_file {
            Some(ref path) => RouteTable::from_file(path)
                .with_context(|| format!("Failed to load route file {:?}", path)),
            None => {
                let table = RouteTable::clinic().context("Built-in route table is invalid")?;
                info!(routes = table.len(), "Using built-in clinic route table");
                Ok(table)
            }
        }
    }
}
