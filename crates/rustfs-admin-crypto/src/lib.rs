//! Cryptography utilities for the RustFS admin client

pub mod hash;

pub use hash::*;
