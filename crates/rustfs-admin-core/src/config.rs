//! Connection configuration for the admin client

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Server address as `host[:port]`
    pub endpoint: String,

    pub access_key: String,

    pub secret_key: String,

    /// Use https
    #[serde(default)]
    pub ssl: bool,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Region bound into request signatures
    #[serde(default = "default_region")]
    pub region: String,

    /// Whole-request deadline in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_region() -> String {
    crate::DEFAULT_REGION.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            ssl: false,
            insecure: false,
            region: default_region(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("ssl", &self.ssl)
            .field("insecure", &self.insecure)
            .field("region", &self.region)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl AdminConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from `RUSTFS_*` environment variables that are set
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("RUSTFS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(user) = std::env::var("RUSTFS_USER") {
            self.access_key = user;
        }
        if let Ok(secret) = std::env::var("RUSTFS_SECRET") {
            self.secret_key = secret;
        }
        if let Ok(region) = std::env::var("RUSTFS_REGION") {
            self.region = region;
        }
        if let Ok(ssl) = std::env::var("RUSTFS_SSL") {
            self.ssl = parse_flag(&ssl);
        }
        if let Ok(insecure) = std::env::var("RUSTFS_INSECURE") {
            self.insecure = parse_flag(&insecure);
        }
        if let Ok(timeout) = std::env::var("RUSTFS_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "endpoint not configured (set RUSTFS_ENDPOINT)".into(),
            ));
        }
        if self.endpoint.contains("://") {
            return Err(Error::InvalidConfig(format!(
                "endpoint must be host[:port] without a scheme, got '{}'",
                self.endpoint
            )));
        }
        if self.access_key.is_empty() {
            return Err(Error::InvalidConfig(
                "access key not configured (set RUSTFS_USER)".into(),
            ));
        }
        if self.secret_key.is_empty() {
            return Err(Error::InvalidConfig(
                "secret key not configured (set RUSTFS_SECRET)".into(),
            ));
        }
        if self.region.is_empty() {
            return Err(Error::InvalidConfig("region must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
