//! Authentication for the RustFS admin API

pub mod signature;

pub use signature::{encode_query, host_header, SignatureV4, Signer};

use rand::Rng;

/// Generate a new access key and secret key pair
pub fn generate_credentials() -> (String, String) {
    let mut rng = rand::rng();

    // Access key: 20 upper-case alphanumerics
    const KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let access_key: String = (0..20)
        .map(|_| KEY_CHARSET[rng.random_range(0..KEY_CHARSET.len())] as char)
        .collect();

    // Secret key: 40 characters, no characters that need escaping in a query
    const SECRET_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let secret_key: String = (0..40)
        .map(|_| SECRET_CHARSET[rng.random_range(0..SECRET_CHARSET.len())] as char)
        .collect();

    (access_key, secret_key)
}
