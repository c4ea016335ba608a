//! user command - manage IAM users

use super::CommandContext;
use crate::UserAction;
use anyhow::{Context, Result};
use colored::Colorize;
use rustfs_admin_auth::generate_credentials;
use rustfs_admin_core::types::{UserAccount, UserAccountUpdate, UserStatus};
use tracing::debug;

pub async fn execute(ctx: &CommandContext, action: UserAction) -> Result<()> {
    let client = ctx.client()?;

    match action {
        UserAction::Create {
            access_key,
            secret_key,
            policy,
        } => {
            let (generated_access, generated_secret) = generate_credentials();
            let access_key = access_key.unwrap_or(generated_access);
            let secret_key = secret_key.unwrap_or(generated_secret);

            let mut user = UserAccount::new(&access_key, &secret_key);
            if let Some(policy) = policy {
                user = user.with_policy(policy);
            }

            debug!(access_key = %access_key, policy = ?user.policy, "creating user");
            client
                .create_user_account(&user)
                .await
                .with_context(|| format!("Failed to create user '{}'", access_key))?;

            if ctx.is_json() {
                ctx.print_json(&serde_json::json!({
                    "access_key": access_key,
                    "secret_key": secret_key,
                    "policy": user.policy,
                }))?;
            } else {
                println!("{}: {}", "create_user".green(), access_key);
                println!("  {}: {}", "Access Key".cyan(), access_key);
                println!("  {}: {}", "Secret Key".cyan(), secret_key);
            }
        }
        UserAction::Info { access_key } => {
            let user = client
                .read_user_account(&access_key)
                .await
                .with_context(|| format!("Failed to read user '{}'", access_key))?;
            if ctx.is_json() {
                ctx.print_json(&user)?;
            } else {
                print_user(&user);
            }
        }
        UserAction::Update {
            access_key,
            status,
            policy,
        } => {
            let mut update = UserAccountUpdate::new(&access_key);
            if let Some(status) = status {
                update = update.with_status(status.parse::<UserStatus>()?);
            }
            if let Some(policy) = policy {
                update = update.with_policy(policy);
            }
            if update.is_empty() {
                anyhow::bail!("Nothing to update; pass --status and/or --policy");
            }

            client
                .update_user_account(&update)
                .await
                .with_context(|| format!("Failed to update user '{}'", access_key))?;
            ctx.info(&format!("{}: {}", "update_user".green(), access_key));
        }
        UserAction::AttachPolicy { access_key, policy } => {
            client
                .attach_policy(&access_key, &policy)
                .await
                .with_context(|| format!("Failed to attach '{}' to '{}'", policy, access_key))?;
            ctx.info(&format!(
                "{}: {} -> {}",
                "attach_policy".green(),
                policy,
                access_key
            ));
        }
        UserAction::Delete { access_key } => {
            client
                .delete_user_account(&access_key)
                .await
                .with_context(|| format!("Failed to delete user '{}'", access_key))?;
            ctx.info(&format!("{}: {}", "delete_user".yellow(), access_key));
        }
    }

    Ok(())
}

fn print_user(user: &UserAccount) {
    println!("{}", user.access_key.blue().bold());
    println!();

    let status = match user.status {
        UserStatus::Enabled => "enabled".green(),
        UserStatus::Disabled => "disabled".red(),
    };
    println!("  {}: {}", "Status".cyan(), status);
    println!(
        "  {}: {}",
        "Policy".cyan(),
        user.policy.as_deref().unwrap_or("(none)")
    );
    if user.groups.is_empty() {
        println!("  {}: (none)", "Groups".cyan());
    } else {
        println!("  {}: {}", "Groups".cyan(), user.groups.join(", "));
    }
}
