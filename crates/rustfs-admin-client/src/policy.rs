//! Canned policy operations

use tracing::debug;

use rustfs_admin_core::types::Policy;
use rustfs_admin_core::{Error, Result};

use crate::client::AdminClient;
use crate::request::RequestData;

fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("policy name must not be empty".into()));
    }
    Ok(())
}

impl AdminClient {
    /// Store a canned policy under `policy.name`
    pub async fn create_policy(&self, policy: &Policy) -> Result<()> {
        let body = policy.encode()?;
        debug!(policy = %policy.name, statements = policy.statement.len(), "creating policy");

        self.execute(
            RequestData::put("add-canned-policy")
                .query("name", &policy.name)
                .json(body),
        )
        .await?;
        Ok(())
    }

    pub async fn read_policy(&self, name: &str) -> Result<Policy> {
        require_name(name)?;
        let body = self
            .execute(RequestData::get("info-canned-policy").query("name", name))
            .await?;
        Policy::decode_reply(&body, name)
    }

    /// Replace the document of an existing policy.
    ///
    /// The server has no separate update call; `add-canned-policy`
    /// overwrites whatever is stored under the name.
    pub async fn update_policy(&self, policy: &Policy) -> Result<()> {
        debug!(policy = %policy.name, "replacing policy document");
        self.create_policy(policy).await
    }

    pub async fn delete_policy(&self, name: &str) -> Result<()> {
        require_name(name)?;
        self.execute(RequestData::delete("remove-canned-policy").query("name", name))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rustfs_admin_core::types::{Statement, POLICY_VERSION};
    use rustfs_admin_core::RemoteState;

    use super::*;
    use crate::testing::FakeAdminServer;

    fn read_only() -> Policy {
        Policy::new("read-only").add_statement(
            Statement::allow()
                .with_actions(["s3:GetObject", "s3:ListBucket"])
                .with_resources(["arn:aws:s3:::reports", "arn:aws:s3:::reports/*"]),
        )
    }

    #[tokio::test]
    async fn test_policy_lifecycle() {
        let server = FakeAdminServer::new();
        let client = server.client();

        client.create_policy(&read_only()).await.unwrap();
        assert_eq!(client.read_policy("read-only").await.unwrap(), read_only());

        let replaced = Policy::new("read-only")
            .add_statement(Statement::allow().with_actions(["s3:GetObject"]));
        client.update_policy(&replaced).await.unwrap();
        assert_eq!(client.read_policy("read-only").await.unwrap(), replaced);

        client.delete_policy("read-only").await.unwrap();
        let err = client.read_policy("read-only").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_name_travels_in_query_only() {
        let server = FakeAdminServer::new();
        server.client().create_policy(&read_only()).await.unwrap();

        let request = server.requests().pop().unwrap();
        assert_eq!(request.url.query(), Some("name=read-only"));
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["Version"], POLICY_VERSION);
        assert!(body.get("Name").is_none());
    }

    #[tokio::test]
    async fn test_reads_scalar_action_documents() {
        let server = FakeAdminServer::new();
        server.add_policy(
            "single",
            r#"{"Version":"2012-10-17","Statement":[{"Effect":"Deny","Action":"s3:DeleteObject","Resource":["arn:aws:s3:::vault/*"]}]}"#,
        );

        let policy = server.client().read_policy("single").await.unwrap();
        assert_eq!(policy.name, "single");
        assert_eq!(policy.statement[0].action, vec!["s3:DeleteObject".to_string()]);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_decode_error() {
        let server = FakeAdminServer::new();
        server.add_policy("broken", r#"{"Statement":[{"Effect":"Allow","Action":7}]}"#);

        let err = server.client().read_policy("broken").await.unwrap_err();
        assert!(matches!(err, Error::PolicyShape { .. }));
    }

    #[tokio::test]
    async fn test_invalid_policy_never_reaches_server() {
        let server = FakeAdminServer::new();
        let client = server.client();

        let empty = Policy::new("empty").add_statement(Statement::allow());
        let err = client.create_policy(&empty).await.unwrap_err();
        assert_eq!(err.remote_state(), RemoteState::Unchanged);

        assert!(client.delete_policy("").await.is_err());
        assert!(server.requests().is_empty());
    }
}
