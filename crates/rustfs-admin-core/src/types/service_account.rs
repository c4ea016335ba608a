//! Service account types and codec

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Expiration used when the caller leaves it unset
pub const NO_EXPIRATION: &str = "9999-01-01T00:00:00.000Z";

/// Scoped API credential, optionally owned by a target user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    pub access_key: String,

    /// Write-only; never populated by a read
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_key: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expiration: String,

    /// Always sent; the server reads `expiration` instead
    #[serde(default)]
    pub expiry: bool,

    /// Set when the account carries no policy of its own
    #[serde(default)]
    pub implied_policy: bool,

    /// Inline policy document (JSON)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_user: String,
}

impl ServiceAccount {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }

    pub fn with_target_user(mut self, user: impl Into<String>) -> Self {
        self.target_user = user.into();
        self
    }

    /// Apply server-facing defaults: a far-future expiration when none is
    /// set, and the implied-policy flag when no policy document is given.
    pub fn normalize(mut self) -> Self {
        if self.expiration.is_empty() {
            self.expiration = NO_EXPIRATION.to_string();
        }
        if self.policy.is_empty() {
            self.implied_policy = true;
        }
        self
    }

    /// Serialize the `add-service-accounts` body (normalized).
    pub fn encode_new(&self) -> Result<Vec<u8>> {
        if self.access_key.is_empty() {
            return Err(Error::InvalidArgument(
                "service account access key must not be empty".into(),
            ));
        }
        let normalized = self.clone().normalize();
        serde_json::to_vec(&normalized).map_err(Error::Encode)
    }

    /// Serialize the `update-service-account` body (normalized, `new*` shape).
    pub fn encode_update(&self) -> Result<Vec<u8>> {
        let normalized = self.clone().normalize();
        serde_json::to_vec(&ServiceAccountUpdate::from(&normalized)).map_err(Error::Encode)
    }

    /// Decode an `info-service-account` reply, keyed by the lookup key.
    pub fn decode_info(body: &[u8], access_key: &str) -> Result<Self> {
        let info: ServiceAccountInfo =
            serde_json::from_slice(body).map_err(|e| Error::decode("info-service-account", e))?;

        Ok(ServiceAccount {
            access_key: access_key.to_string(),
            secret_key: String::new(),
            name: info.name,
            description: info.description,
            expiration: info.expiration.unwrap_or_default(),
            expiry: false,
            implied_policy: info.implied_policy,
            policy: info.policy.unwrap_or_default(),
            target_user: info.parent_user,
        })
    }
}

/// Rename payload accepted by `update-service-account`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountUpdate {
    pub new_access_key: String,
    pub new_secret_key: String,
    pub new_description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub new_expiration: String,
    pub new_name: String,
}

impl From<&ServiceAccount> for ServiceAccountUpdate {
    fn from(account: &ServiceAccount) -> Self {
        Self {
            new_access_key: account.access_key.clone(),
            new_secret_key: account.secret_key.clone(),
            new_description: account.description.clone(),
            new_expiration: account.expiration.clone(),
            new_name: account.name.clone(),
        }
    }
}

/// Credentials returned by create and update, possibly rotated by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub expiration: String,
}

#[derive(Deserialize)]
struct CredentialsReply {
    credentials: Credentials,
}

impl Credentials {
    /// Extract credentials from a create or update reply.
    pub fn decode_reply(body: &[u8], what: &'static str) -> Result<Self> {
        serde_json::from_slice::<CredentialsReply>(body)
            .map(|reply| reply.credentials)
            .map_err(|e| Error::decode(what, e))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceAccountInfo {
    #[serde(default)]
    parent_user: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    expiration: Option<String>,
    #[serde(default)]
    implied_policy: bool,
    #[serde(default)]
    policy: Option<String>,
}
