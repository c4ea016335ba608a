//! service-account command - manage service accounts

use super::CommandContext;
use crate::ServiceAccountAction;
use anyhow::{Context, Result};
use colored::Colorize;
use rustfs_admin_auth::generate_credentials;
use rustfs_admin_core::types::{Credentials, ServiceAccount, NO_EXPIRATION};
use std::fs;
use tracing::debug;

pub async fn execute(ctx: &CommandContext, action: ServiceAccountAction) -> Result<()> {
    let client = ctx.client()?;

    match action {
        ServiceAccountAction::Create {
            access_key,
            secret_key,
            name,
            description,
            target_user,
            policy_file,
            expiration,
        } => {
            let (generated_access, generated_secret) = generate_credentials();
            let mut account = ServiceAccount::new(
                access_key.unwrap_or(generated_access),
                secret_key.unwrap_or(generated_secret),
            )
            .with_name(name)
            .with_description(description);

            if let Some(user) = target_user {
                account = account.with_target_user(user);
            }
            if let Some(path) = policy_file {
                let document = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read policy file: {:?}", path))?;
                account = account.with_policy(document);
            }
            if let Some(expiration) = expiration {
                account.expiration = expiration;
            }

            debug!(access_key = %account.access_key, target_user = %account.target_user, "creating service account");
            let creds = client
                .create_service_account(&account)
                .await
                .with_context(|| {
                    format!("Failed to create service account '{}'", account.access_key)
                })?;

            print_credentials(ctx, "create_service_account", &creds)?;
        }
        ServiceAccountAction::Info { access_key } => {
            let account = client
                .read_service_account(&access_key)
                .await
                .with_context(|| format!("Failed to read service account '{}'", access_key))?;
            if ctx.is_json() {
                ctx.print_json(&account)?;
            } else {
                print_account(&account);
            }
        }
        ServiceAccountAction::Update {
            access_key,
            secret_key,
            name,
            description,
            expiration,
        } => {
            // the update payload replaces every field, so start from what is stored
            let mut account = client
                .read_service_account(&access_key)
                .await
                .with_context(|| format!("Failed to read service account '{}'", access_key))?;
            if let Some(secret_key) = secret_key {
                account.secret_key = secret_key;
            }
            if let Some(name) = name {
                account.name = name;
            }
            if let Some(description) = description {
                account.description = description;
            }
            if let Some(expiration) = expiration {
                account.expiration = expiration;
            }

            let updated = client
                .update_service_account(&account)
                .await
                .with_context(|| format!("Failed to update service account '{}'", access_key))?;

            match &updated.credentials {
                Some(creds) => print_credentials(ctx, "update_service_account", creds)?,
                None if ctx.is_json() => ctx.print_json(&updated.account)?,
                None => {
                    ctx.info(&format!("{}: {}", "update_service_account".green(), access_key));
                }
            }
        }
        ServiceAccountAction::Delete { access_key } => {
            client
                .delete_service_account(&access_key)
                .await
                .with_context(|| format!("Failed to delete service account '{}'", access_key))?;
            ctx.info(&format!(
                "{}: {}",
                "delete_service_account".yellow(),
                access_key
            ));
        }
    }

    Ok(())
}

fn print_credentials(ctx: &CommandContext, verb: &str, creds: &Credentials) -> Result<()> {
    if ctx.is_json() {
        return ctx.print_json(creds);
    }

    println!("{}: {}", verb.green(), creds.access_key);
    println!("  {}: {}", "Access Key".cyan(), creds.access_key);
    println!("  {}: {}", "Secret Key".cyan(), creds.secret_key);
    println!("  {}: {}", "Expiration".cyan(), display_expiration(&creds.expiration));
    Ok(())
}

fn print_account(account: &ServiceAccount) {
    println!("{}", account.access_key.blue().bold());
    println!();

    let or_none = |value: &str| {
        if value.is_empty() {
            "(none)".to_string()
        } else {
            value.to_string()
        }
    };

    println!("  {}: {}", "Name".cyan(), or_none(&account.name));
    println!("  {}: {}", "Description".cyan(), or_none(&account.description));
    println!("  {}: {}", "Parent User".cyan(), or_none(&account.target_user));
    println!(
        "  {}: {}",
        "Expiration".cyan(),
        display_expiration(&account.expiration)
    );
    if account.implied_policy {
        println!("  {}: inherited from parent", "Policy".cyan());
    } else {
        println!("  {}: {}", "Policy".cyan(), or_none(&account.policy));
    }
}

fn display_expiration(expiration: &str) -> String {
    if expiration.is_empty() || expiration == NO_EXPIRATION {
        "never".to_string()
    } else {
        expiration.to_string()
    }
}
