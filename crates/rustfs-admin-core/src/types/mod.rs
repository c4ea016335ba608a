//! Core types and wire codecs for the RustFS admin API

mod policy;
mod service_account;
mod step;
mod user;

pub use policy::*;
pub use service_account::*;
pub use step::*;
pub use user::*;
