//! IAM user operations

use tracing::debug;

use rustfs_admin_core::types::{Step, StepSequence, UserAccount, UserAccountUpdate};
use rustfs_admin_core::{Error, Result};

use crate::client::AdminClient;
use crate::request::RequestData;

fn require_access_key(access_key: &str) -> Result<()> {
    if access_key.is_empty() {
        return Err(Error::InvalidArgument("user access key must not be empty".into()));
    }
    Ok(())
}

impl AdminClient {
    /// Create a user, then attach its policy when one is given.
    ///
    /// The user is always created enabled. If the attach fails the user
    /// stays in place and the error is [`Error::PartialFailure`].
    pub async fn create_user_account(&self, user: &UserAccount) -> Result<()> {
        let body = user.encode_new()?;
        let mut steps = StepSequence::new();

        let created = self
            .execute(
                RequestData::put("add-user")
                    .query("accessKey", &user.access_key)
                    .json(body),
            )
            .await;
        steps.record(Step::AddUser, created)?;

        if let Some(policy) = user.policy.as_deref().filter(|p| !p.is_empty()) {
            let attached = self.attach_policy(&user.access_key, policy).await;
            steps.record(Step::AttachPolicy, attached)?;
        }

        debug!(user = %user.access_key, outcome = ?steps.outcome(), "user created");
        Ok(())
    }

    /// Fetch a user. The secret key is never returned.
    pub async fn read_user_account(&self, access_key: &str) -> Result<UserAccount> {
        require_access_key(access_key)?;
        let body = self
            .execute(RequestData::get("user-info").query("accessKey", access_key))
            .await?;
        UserAccount::decode_info(&body, access_key)
    }

    /// Apply the fields present in `update`: status first, then policy.
    pub async fn update_user_account(&self, update: &UserAccountUpdate) -> Result<()> {
        require_access_key(&update.access_key)?;
        if update.is_empty() {
            debug!(user = %update.access_key, "nothing to update");
            return Ok(());
        }

        let mut steps = StepSequence::new();

        if let Some(status) = update.status {
            let set = self
                .execute(
                    RequestData::put("user-info")
                        .query("accessKey", &update.access_key)
                        .query("status", status.as_str()),
                )
                .await
                .map(|_| ());
            steps.record(Step::SetUserStatus, set)?;
        }

        if let Some(policy) = update.policy.as_deref().filter(|p| !p.is_empty()) {
            let attached = self.attach_policy(&update.access_key, policy).await;
            steps.record(Step::AttachPolicy, attached)?;
        }

        debug!(user = %update.access_key, outcome = ?steps.outcome(), "user updated");
        Ok(())
    }

    pub async fn delete_user_account(&self, access_key: &str) -> Result<()> {
        require_access_key(access_key)?;
        self.execute(RequestData::delete("remove-user").query("accessKey", access_key))
            .await?;
        Ok(())
    }

    /// Attach a canned policy to a user. Re-attaching is harmless.
    pub async fn attach_policy(&self, access_key: &str, policy: &str) -> Result<()> {
        require_access_key(access_key)?;
        if policy.is_empty() {
            return Err(Error::InvalidArgument("policy name must not be empty".into()));
        }

        self.execute(
            RequestData::put("set-user-or-group-policy")
                .query("userOrGroup", access_key)
                .query("policyName", policy)
                .query("isGroup", "false"),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rustfs_admin_core::types::UserStatus;
    use rustfs_admin_core::RemoteState;

    use super::*;
    use crate::testing::FakeAdminServer;

    const READWRITE: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["s3:*"],"Resource":["arn:aws:s3:::*"]}]}"#;

    #[tokio::test]
    async fn test_create_with_policy() {
        let server = FakeAdminServer::new();
        server.add_policy("readwrite", READWRITE);
        let client = server.client();

        let user = UserAccount::new("alice", "alice-secret-key").with_policy("readwrite");
        client.create_user_account(&user).await.unwrap();

        assert_eq!(server.operations(), vec!["add-user", "set-user-or-group-policy"]);
        let stored = server.user("alice").unwrap();
        assert_eq!(stored.status, "enabled");
        assert_eq!(stored.secret_key, "alice-secret-key");

        let read = client.read_user_account("alice").await.unwrap();
        assert_eq!(read.access_key, "alice");
        assert_eq!(read.secret_key, None);
        assert_eq!(read.policy.as_deref(), Some("readwrite"));
    }

    #[tokio::test]
    async fn test_create_without_policy_is_one_call() {
        let server = FakeAdminServer::new();
        server
            .client()
            .create_user_account(&UserAccount::new("bob", "bob-secret-key"))
            .await
            .unwrap();

        assert_eq!(server.operations(), vec!["add-user"]);
    }

    #[tokio::test]
    async fn test_failed_attach_is_partial_failure() {
        let server = FakeAdminServer::new();
        let client = server.client();

        // "missing" was never created, so the attach is rejected
        let user = UserAccount::new("carol", "carol-secret-key").with_policy("missing");
        let err = client.create_user_account(&user).await.unwrap_err();

        match &err {
            Error::PartialFailure {
                completed,
                failed,
                source,
            } => {
                assert_eq!(completed, &vec![Step::AddUser]);
                assert_eq!(*failed, Step::AttachPolicy);
                assert_eq!(source.status(), Some(404));
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
        assert_eq!(err.remote_state(), RemoteState::PartiallyMutated);

        let read = client.read_user_account("carol").await.unwrap();
        assert_eq!(read.status, UserStatus::Enabled);
        assert_eq!(read.policy, None);
        assert!(read.groups.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_is_not_partial() {
        let server = FakeAdminServer::new();
        server.respond("add-user", 500, "boom");

        let user = UserAccount::new("dave", "dave-secret-key").with_policy("readwrite");
        let err = server.client().create_user_account(&user).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(server.operations(), vec!["add-user"]);
    }

    #[tokio::test]
    async fn test_create_twice_fails_loudly() {
        let server = FakeAdminServer::new();
        let client = server.client();
        let user = UserAccount::new("erin", "erin-secret-key");

        client.create_user_account(&user).await.unwrap();
        let err = client.create_user_account(&user).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn test_update_status_and_policy() {
        let server = FakeAdminServer::new();
        server.add_policy("readwrite", READWRITE);
        let client = server.client();
        client
            .create_user_account(&UserAccount::new("frank", "frank-secret-key"))
            .await
            .unwrap();

        let update = UserAccountUpdate::new("frank")
            .with_status(UserStatus::Disabled)
            .with_policy("readwrite");
        client.update_user_account(&update).await.unwrap();

        let read = client.read_user_account("frank").await.unwrap();
        assert_eq!(read.status, UserStatus::Disabled);
        assert_eq!(read.policy.as_deref(), Some("readwrite"));

        let status_call = &server.requests()[1];
        assert_eq!(status_call.url.query(), Some("accessKey=frank&status=disabled"));
    }

    #[tokio::test]
    async fn test_update_skips_absent_fields() {
        let server = FakeAdminServer::new();
        server.add_policy("readwrite", READWRITE);
        let client = server.client();
        client
            .create_user_account(&UserAccount::new("grace", "grace-secret-key"))
            .await
            .unwrap();

        client
            .update_user_account(&UserAccountUpdate::new("grace").with_policy("readwrite"))
            .await
            .unwrap();
        client
            .update_user_account(&UserAccountUpdate::new("grace"))
            .await
            .unwrap();

        assert_eq!(server.operations(), vec!["add-user", "set-user-or-group-policy"]);
    }

    #[tokio::test]
    async fn test_update_attach_failure_after_status_is_partial() {
        let server = FakeAdminServer::new();
        let client = server.client();
        client
            .create_user_account(&UserAccount::new("heidi", "heidi-secret-key"))
            .await
            .unwrap();

        let update = UserAccountUpdate::new("heidi")
            .with_status(UserStatus::Disabled)
            .with_policy("missing");
        let err = client.update_user_account(&update).await.unwrap_err();

        assert!(matches!(
            err,
            Error::PartialFailure {
                failed: Step::AttachPolicy,
                ..
            }
        ));
        assert_eq!(server.user("heidi").unwrap().status, "disabled");
    }

    #[tokio::test]
    async fn test_delete_needs_only_access_key() {
        let server = FakeAdminServer::new();
        let client = server.client();
        client
            .create_user_account(&UserAccount::new("ivan", "ivan-secret-key"))
            .await
            .unwrap();

        client.delete_user_account("ivan").await.unwrap();
        assert!(server.user("ivan").is_none());

        let request = server.requests().pop().unwrap();
        assert!(request.body.is_empty());
        assert_eq!(request.url.query(), Some("accessKey=ivan"));
    }
}
