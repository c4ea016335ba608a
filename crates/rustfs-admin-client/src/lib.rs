//! RustFS Admin Client
//!
//! Signed, async access to the RustFS admin API: canned policies, IAM users
//! and service accounts.
//!
//! ```no_run
//! use rustfs_admin_client::AdminClient;
//! use rustfs_admin_core::{types::UserAccount, AdminConfig};
//!
//! # async fn run() -> rustfs_admin_core::Result<()> {
//! let config = AdminConfig::new("localhost:9000", "rustfsadmin", "rustfsadmin");
//! let client = AdminClient::new(config)?;
//!
//! if client.is_admin().await? {
//!     let user = UserAccount::new("alice", "alice-secret-key").with_policy("readwrite");
//!     client.create_user_account(&user).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod policy;
pub mod request;
pub mod service_account;
pub mod transport;
pub mod user;

#[cfg(test)]
mod testing;

pub use client::AdminClient;
pub use request::RequestData;
pub use service_account::ServiceAccountUpdated;
pub use transport::{RawResponse, ReqwestTransport, SignedRequest, Transport, TransportConfig};
