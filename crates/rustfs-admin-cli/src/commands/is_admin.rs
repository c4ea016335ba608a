//! is-admin command - check the configured credentials

use super::CommandContext;
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let client = ctx.client()?;
    debug!(endpoint = %client.endpoint_url(), "checking admin rights");

    let is_admin = client
        .is_admin()
        .await
        .context("Failed to check admin rights")?;

    if ctx.is_json() {
        ctx.print_json(&serde_json::json!({
            "access_key": ctx.config.access_key,
            "is_admin": is_admin,
        }))
    } else {
        let verdict = if is_admin { "yes".green() } else { "no".red() };
        println!("{}: {}", ctx.config.access_key.cyan(), verdict);
        Ok(())
    }
}
