//! rustfs-admin - administer a RustFS server
//!
//! Manages IAM users, canned policies and service accounts through the
//! RustFS admin API.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::CommandContext;
use config::Profile;

#[derive(Parser)]
#[command(name = "rustfs-admin")]
#[command(version = rustfs_admin_core::VERSION)]
#[command(about = "Administer users, policies and service accounts on a RustFS server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile from ~/.rustfs-admin/config.toml
    #[arg(short, long, global = true, env = "RUSTFS_PROFILE")]
    profile: Option<String>,

    /// Server address (host:port)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Admin access key
    #[arg(long, global = true)]
    access_key: Option<String>,

    /// Admin secret key
    #[arg(long, global = true)]
    secret_key: Option<String>,

    /// Use https
    #[arg(long, global = true)]
    ssl: bool,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Print debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUSTFS_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage CLI configuration
    Configure {
        #[command(subcommand)]
        action: Option<ConfigureAction>,
    },

    /// Check whether the configured credentials have admin rights
    IsAdmin,

    /// Manage canned policies
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },

    /// Manage IAM users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage service accounts
    #[command(name = "service-account", alias = "svcacct")]
    ServiceAccount {
        #[command(subcommand)]
        action: ServiceAccountAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigureAction {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
    /// List configuration values and profiles
    List,
    /// Create an empty profile
    AddProfile { name: String },
    /// Remove a profile
    RemoveProfile { name: String },
}

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Create a policy from a JSON document
    Create {
        name: String,
        /// Policy document file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show a policy
    Info { name: String },
    /// Replace the document of a policy
    Update {
        name: String,
        /// Policy document file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a policy
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user; keys are generated when omitted
    Create {
        access_key: Option<String>,
        #[arg(long)]
        secret_key: Option<String>,
        /// Policy to attach after creation
        #[arg(long)]
        policy: Option<String>,
    },
    /// Show a user
    Info { access_key: String },
    /// Change status and/or policy of a user
    Update {
        access_key: String,
        /// enabled or disabled
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        policy: Option<String>,
    },
    /// Attach a policy to a user
    AttachPolicy { access_key: String, policy: String },
    /// Delete a user
    Delete { access_key: String },
}

#[derive(Subcommand)]
pub enum ServiceAccountAction {
    /// Create a service account; keys are generated when omitted
    Create {
        #[arg(long)]
        access_key: Option<String>,
        #[arg(long)]
        secret_key: Option<String>,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// User the account belongs to
        #[arg(long)]
        target_user: Option<String>,
        /// Inline policy document file
        #[arg(long)]
        policy_file: Option<PathBuf>,
        /// RFC 3339 expiration
        #[arg(long)]
        expiration: Option<String>,
    },
    /// Show a service account
    Info { access_key: String },
    /// Change name, description, expiration or secret of a service account
    Update {
        access_key: String,
        #[arg(long)]
        secret_key: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        expiration: Option<String>,
    },
    /// Delete a service account
    Delete { access_key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let profile = cli.profile.as_deref();
    let mut config = Profile::load(profile)?.to_admin_config();

    // Override with CLI args
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(access_key) = cli.access_key {
        config.access_key = access_key;
    }
    if let Some(secret_key) = cli.secret_key {
        config.secret_key = secret_key;
    }
    if cli.ssl {
        config.ssl = true;
    }
    if cli.insecure {
        config.insecure = true;
    }

    let ctx = CommandContext {
        config,
        profile: cli.profile.clone(),
        output_format: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Configure { action } => commands::configure::execute(&ctx, action).await,
        Commands::IsAdmin => commands::is_admin::execute(&ctx).await,
        Commands::Policy { action } => commands::policy::execute(&ctx, action).await,
        Commands::User { action } => commands::user::execute(&ctx, action).await,
        Commands::ServiceAccount { action } => {
            commands::service_account::execute(&ctx, action).await
        }
    }
}
