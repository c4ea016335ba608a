//! RustFS Admin Core Library
//!
//! Core types, wire codecs, configuration and errors shared by the RustFS
//! admin client and CLI.

pub mod config;
pub mod error;
pub mod types;

pub use config::AdminConfig;
pub use error::{Error, ErrorKind, RemoteState, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default signing region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Signing service identifier bound into every request signature
pub const SIGNING_SERVICE: &str = "s3";

/// Admin API root path on the server
pub const ADMIN_API_ROOT: &str = "rustfs/admin";

/// Admin API version segment
pub const ADMIN_API_VERSION: &str = "v3";
