//! policy command - manage canned policies

use super::CommandContext;
use crate::PolicyAction;
use anyhow::{Context, Result};
use colored::Colorize;
use rustfs_admin_core::types::{decode_statements, Effect, Policy};
use std::fs;
use std::path::Path;

pub async fn execute(ctx: &CommandContext, action: PolicyAction) -> Result<()> {
    let client = ctx.client()?;

    match action {
        PolicyAction::Create { name, file } => {
            let policy = load_policy(&name, &file)?;
            client
                .create_policy(&policy)
                .await
                .with_context(|| format!("Failed to create policy '{}'", name))?;
            ctx.info(&format!("{}: {}", "create_policy".green(), name));
        }
        PolicyAction::Info { name } => {
            let policy = client
                .read_policy(&name)
                .await
                .with_context(|| format!("Failed to read policy '{}'", name))?;
            if ctx.is_json() {
                ctx.print_json(&policy)?;
            } else {
                print_policy(&policy);
            }
        }
        PolicyAction::Update { name, file } => {
            let policy = load_policy(&name, &file)?;
            client
                .update_policy(&policy)
                .await
                .with_context(|| format!("Failed to update policy '{}'", name))?;
            ctx.info(&format!("{}: {}", "update_policy".green(), name));
        }
        PolicyAction::Delete { name } => {
            client
                .delete_policy(&name)
                .await
                .with_context(|| format!("Failed to delete policy '{}'", name))?;
            ctx.info(&format!("{}: {}", "delete_policy".yellow(), name));
        }
    }

    Ok(())
}

/// Read a policy document; `Action` may be a list or a single string
fn load_policy(name: &str, path: &Path) -> Result<Policy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {:?}", path))?;
    let mut policy = Policy::new(name);
    policy.statement = decode_statements(&content)
        .with_context(|| format!("Invalid policy document: {:?}", path))?;
    Ok(policy)
}

fn print_policy(policy: &Policy) {
    println!("{} ({})", policy.name.blue().bold(), policy.version.dimmed());
    println!();

    for (idx, statement) in policy.statement.iter().enumerate() {
        let effect = match statement.effect {
            Effect::Allow => "Allow".green(),
            Effect::Deny => "Deny".red(),
        };
        println!("  [{}] {}", idx, effect);
        println!("      {}: {}", "Actions".cyan(), statement.action.join(", "));
        if !statement.resource.is_empty() {
            println!("      {}: {}", "Resources".cyan(), statement.resource.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_policy_accepts_scalar_action() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Version":"2012-10-17","Statement":[{{"Effect":"Allow","Action":"s3:GetObject","Resource":["arn:aws:s3:::docs/*"]}}]}}"#
        )
        .unwrap();

        let policy = load_policy("docs-read", file.path()).unwrap();
        assert_eq!(policy.name, "docs-read");
        assert_eq!(policy.statement[0].action, vec!["s3:GetObject".to_string()]);
    }

    #[test]
    fn test_load_policy_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not a policy").unwrap();
        assert!(load_policy("bad", file.path()).is_err());
    }
}
