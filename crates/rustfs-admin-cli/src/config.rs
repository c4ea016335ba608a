//! Profile management for the rustfs-admin CLI
//!
//! Config file location: ~/.rustfs-admin/config.toml
//!
//! Example config:
//! ```toml
//! [default]
//! endpoint = "localhost:9000"
//! access_key = "rustfsadmin"
//! secret_key = "rustfsadmin"
//!
//! [production]
//! endpoint = "rustfs.example.com:443"
//! access_key = "prod-admin"
//! secret_key = "prod-secret"
//! ssl = true
//! ```
//!
//! Values from the file are overridden by `RUSTFS_*` environment variables
//! and then by command-line flags.

use anyhow::{Context, Result};
use rustfs_admin_core::{AdminConfig, DEFAULT_REGION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";

/// One named connection profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Server address (host:port)
    pub endpoint: Option<String>,

    /// Admin access key
    pub access_key: Option<String>,

    /// Admin secret key
    pub secret_key: Option<String>,

    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,

    /// Use https
    #[serde(default)]
    pub ssl: bool,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            secret_key: None,
            region: default_region(),
            ssl: false,
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

/// Configuration file with multiple profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub profiles: BTreeMap<String, Profile>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))
    }
}

impl Profile {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let home = directories::BaseDirs::new()
            .context("Could not determine home directory")?
            .home_dir()
            .to_path_buf();

        Ok(home.join(".rustfs-admin"))
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load a profile from the default config file
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path()?, profile)
    }

    pub fn load_from(path: &Path, profile: Option<&str>) -> Result<Self> {
        let name = profile.unwrap_or(DEFAULT_PROFILE);
        Ok(ConfigFile::read(path)?
            .profiles
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    /// Save this profile to the default config file
    pub fn save(&self, profile: Option<&str>) -> Result<()> {
        self.save_to(&Self::config_path()?, profile)
    }

    pub fn save_to(&self, path: &Path, profile: Option<&str>) -> Result<()> {
        let mut file = ConfigFile::read(path)?;
        file.profiles
            .insert(profile.unwrap_or(DEFAULT_PROFILE).to_string(), self.clone());
        file.write(path)
    }

    /// List all profiles
    pub fn list_profiles() -> Result<Vec<String>> {
        let file = ConfigFile::read(&Self::config_path()?)?;
        Ok(file.profiles.into_keys().collect())
    }

    /// Delete a profile
    pub fn delete_profile(profile: &str) -> Result<()> {
        let path = Self::config_path()?;
        let mut file = ConfigFile::read(&path)?;
        if file.profiles.remove(profile).is_some() {
            file.write(&path)?;
        }
        Ok(())
    }

    /// Connection settings: this profile, then `RUSTFS_*` environment
    /// variables on top
    pub fn to_admin_config(&self) -> AdminConfig {
        let mut config = AdminConfig {
            endpoint: self.endpoint.clone().unwrap_or_default(),
            access_key: self.access_key.clone().unwrap_or_default(),
            secret_key: self.secret_key.clone().unwrap_or_default(),
            ssl: self.ssl,
            insecure: self.insecure,
            region: self.region.clone(),
            timeout_secs: self.timeout,
            ..AdminConfig::default()
        };
        config.apply_env();
        config
    }

    /// Get a config value by key name
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "endpoint" => self.endpoint.clone(),
            "access_key" => self.access_key.clone(),
            "secret_key" => self.secret_key.as_ref().map(|_| "***".to_string()), // Hide secret
            "region" => Some(self.region.clone()),
            "ssl" => Some(self.ssl.to_string()),
            "insecure" => Some(self.insecure.to_string()),
            "timeout" => Some(self.timeout.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key name
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => self.endpoint = Some(value.to_string()),
            "access_key" => self.access_key = Some(value.to_string()),
            "secret_key" => self.secret_key = Some(value.to_string()),
            "region" => self.region = value.to_string(),
            "ssl" => self.ssl = value.parse()?,
            "insecure" => self.insecure = value.parse()?,
            "timeout" => self.timeout = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get all config keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "endpoint",
            "access_key",
            "secret_key",
            "region",
            "ssl",
            "insecure",
            "timeout",
        ]
    }
}
