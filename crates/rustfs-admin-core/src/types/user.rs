//! User account types and codec

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Account status as understood by the admin API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Enabled,
    Disabled,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Enabled => "enabled",
            UserStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "enabled" => Ok(UserStatus::Enabled),
            "disabled" => Ok(UserStatus::Disabled),
            other => Err(Error::InvalidArgument(format!(
                "user status must be enabled or disabled, got '{}'",
                other
            ))),
        }
    }
}

/// IAM user managed through the admin API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    pub access_key: String,
    /// Write-only; never populated by a read
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    pub status: UserStatus,
    pub policy: Option<String>,
    pub groups: Vec<String>,
}

impl UserAccount {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: Some(secret_key.into()),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Serialize the `add-user` body. New accounts are always enabled.
    pub fn encode_new(&self) -> Result<Vec<u8>> {
        if self.access_key.is_empty() {
            return Err(Error::InvalidArgument("user access key must not be empty".into()));
        }
        let secret_key = match self.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "user '{}' needs a secret key to be created",
                    self.access_key
                )))
            }
        };

        let body = AddUserBody {
            access_key: &self.access_key,
            secret_key,
            status: UserStatus::Enabled,
        };
        serde_json::to_vec(&body).map_err(Error::Encode)
    }

    /// Decode a `user-info` reply. The server does not echo the access key,
    /// so the lookup key is used instead.
    pub fn decode_info(body: &[u8], access_key: &str) -> Result<Self> {
        let reply: UserInfoReply =
            serde_json::from_slice(body).map_err(|e| Error::decode("user-info", e))?;

        Ok(UserAccount {
            access_key: access_key.to_string(),
            secret_key: None,
            status: reply.status,
            policy: reply.policy_name.filter(|p| !p.is_empty()),
            groups: reply.member_of.unwrap_or_default(),
        })
    }
}

/// Desired changes to an existing user; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAccountUpdate {
    pub access_key: String,
    pub status: Option<UserStatus>,
    pub policy: Option<String>,
}

impl UserAccountUpdate {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.policy.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddUserBody<'a> {
    access_key: &'a str,
    secret_key: &'a str,
    status: UserStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfoReply {
    #[serde(default)]
    status: UserStatus,
    #[serde(default)]
    policy_name: Option<String>,
    #[serde(default)]
    member_of: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_always_enabled() {
        let mut user = UserAccount::new("alice", "s3cr3t-key");
        user.status = UserStatus::Disabled;

        let body: serde_json::Value = serde_json::from_slice(&user.encode_new().unwrap()).unwrap();
        assert_eq!(body["status"], "enabled");
        assert_eq!(body["accessKey"], "alice");
        assert_eq!(body["secretKey"], "s3cr3t-key");
    }

    #[test]
    fn test_new_user_requires_secret() {
        let user = UserAccount {
            access_key: "bob".into(),
            ..Default::default()
        };
        assert!(matches!(user.encode_new(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_decode_info_uses_lookup_key() {
        let body = br#"{"status":"disabled","policyName":"readwrite","memberOf":["devs"]}"#;
        let user = UserAccount::decode_info(body, "carol").unwrap();

        assert_eq!(user.access_key, "carol");
        assert_eq!(user.secret_key, None);
        assert_eq!(user.status, UserStatus::Disabled);
        assert_eq!(user.policy.as_deref(), Some("readwrite"));
        assert_eq!(user.groups, vec!["devs".to_string()]);
    }

    #[test]
    fn test_decode_info_tolerates_null_groups() {
        let body = br#"{"status":"enabled","policyName":"","memberOf":null}"#;
        let user = UserAccount::decode_info(body, "dave").unwrap();

        assert_eq!(user.policy, None);
        assert!(user.groups.is_empty());
    }

    #[test]
    fn test_decode_info_rejects_unknown_status() {
        let err = UserAccount::decode_info(br#"{"status":"frozen"}"#, "erin").unwrap_err();
        assert!(matches!(err, Error::Decode { what: "user-info", .. }));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UserAccountUpdate::new("x").is_empty());
        assert!(UserAccountUpdate::new("x").with_policy("").is_empty());
        assert!(!UserAccountUpdate::new("x").with_status(UserStatus::Enabled).is_empty());
    }
}
