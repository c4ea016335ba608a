//! configure command - manage profiles

use super::CommandContext;
use crate::config::Profile;
use crate::ConfigureAction;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

pub async fn execute(ctx: &CommandContext, action: Option<ConfigureAction>) -> Result<()> {
    let profile = ctx.profile.as_deref();
    match action {
        Some(ConfigureAction::Set { key, value }) => set_config(profile, &key, &value),
        Some(ConfigureAction::Get { key }) => get_config(profile, &key),
        Some(ConfigureAction::List) => list_config(ctx, profile),
        Some(ConfigureAction::AddProfile { name }) => add_profile(&name),
        Some(ConfigureAction::RemoveProfile { name }) => remove_profile(&name),
        None => interactive_configure(profile),
    }
}

fn set_config(profile: Option<&str>, key: &str, value: &str) -> Result<()> {
    let mut config = Profile::load(profile)?;
    config.set_value(key, value)?;
    config.save(profile)?;

    let shown = if key == "secret_key" { "***" } else { value };
    println!("Set {} = {}", key.cyan(), shown);
    Ok(())
}

fn get_config(profile: Option<&str>, key: &str) -> Result<()> {
    let config = Profile::load(profile)?;
    match config.get_value(key) {
        Some(value) => println!("{}", value),
        None => println!("(not set)"),
    }
    Ok(())
}

fn list_config(ctx: &CommandContext, profile: Option<&str>) -> Result<()> {
    let config = Profile::load(profile)?;

    if ctx.is_json() {
        let mut shown = config.clone();
        shown.secret_key = shown.secret_key.map(|_| "***".to_string());
        return ctx.print_json(&shown);
    }

    println!("{}", "Current configuration:".bold());
    println!();

    for key in Profile::keys() {
        let value = config.get_value(key).unwrap_or_else(|| "(not set)".to_string());
        println!("  {}: {}", key.cyan(), value);
    }

    println!();
    println!("{}", "Available profiles:".bold());

    let profiles = Profile::list_profiles()?;
    if profiles.is_empty() {
        println!("  (none)");
    } else {
        for profile in profiles {
            println!("  - {}", profile);
        }
    }

    println!();
    println!(
        "Config file: {}",
        Profile::config_path()?.display().to_string().dimmed()
    );

    Ok(())
}

fn add_profile(name: &str) -> Result<()> {
    Profile::default().save(Some(name))?;
    println!("Created profile: {}", name.green());
    println!(
        "Use 'rustfs-admin configure set <key> <value> --profile {}' to configure it.",
        name
    );
    Ok(())
}

fn remove_profile(name: &str) -> Result<()> {
    Profile::delete_profile(name)?;
    println!("Removed profile: {}", name.red());
    Ok(())
}

fn prompt(label: &str, current: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", label, current);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok((!input.is_empty()).then(|| input.to_string()))
}

fn interactive_configure(profile: Option<&str>) -> Result<()> {
    println!("{}", "RustFS Admin Configuration".bold());
    println!("Press Enter to keep current value.\n");

    let mut config = Profile::load(profile).unwrap_or_default();

    if let Some(endpoint) = prompt("Endpoint (host:port)", config.endpoint.as_deref().unwrap_or(""))? {
        config.endpoint = Some(endpoint);
    }
    if let Some(access_key) = prompt("Access Key", config.access_key.as_deref().unwrap_or(""))? {
        config.access_key = Some(access_key);
    }
    let masked = if config.secret_key.is_some() { "***" } else { "" };
    if let Some(secret_key) = prompt("Secret Key", masked)? {
        config.secret_key = Some(secret_key);
    }
    if let Some(ssl) = prompt("Use TLS (true/false)", &config.ssl.to_string())? {
        config.ssl = ssl.parse()?;
    }
    if let Some(region) = prompt("Region", &config.region)? {
        config.region = region;
    }

    config.save(profile)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        "✓".green(),
        Profile::config_path()?.display()
    );

    Ok(())
}
