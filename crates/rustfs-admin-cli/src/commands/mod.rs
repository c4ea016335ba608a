//! CLI command implementations

pub mod configure;
pub mod is_admin;
pub mod policy;
pub mod service_account;
pub mod user;

use anyhow::{Context, Result};
use rustfs_admin_client::AdminClient;
use rustfs_admin_core::AdminConfig;
use serde::Serialize;

use crate::OutputFormat;

/// Context passed to all commands
pub struct CommandContext {
    pub config: AdminConfig,
    pub profile: Option<String>,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    /// Build an admin client from the resolved configuration
    pub fn client(&self) -> Result<AdminClient> {
        AdminClient::new(self.config.clone()).with_context(|| {
            "Could not set up the admin client. Set RUSTFS_ENDPOINT, RUSTFS_USER and RUSTFS_SECRET or use 'rustfs-admin configure'"
        })
    }

    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }
}
