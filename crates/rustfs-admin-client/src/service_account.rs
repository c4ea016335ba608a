//! Service account operations

use tracing::debug;

use rustfs_admin_core::types::{Credentials, ServiceAccount, Step, StepSequence};
use rustfs_admin_core::{Error, Result};

use crate::client::AdminClient;
use crate::request::RequestData;

/// Result of [`AdminClient::update_service_account`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountUpdated {
    /// Credentials the server rotated, if it reported any
    pub credentials: Option<Credentials>,
    /// The account as stored after the update
    pub account: ServiceAccount,
}

fn require_access_key(access_key: &str) -> Result<()> {
    if access_key.is_empty() {
        return Err(Error::InvalidArgument(
            "service account access key must not be empty".into(),
        ));
    }
    Ok(())
}

impl AdminClient {
    /// Create a service account and return the credentials the server issued
    pub async fn create_service_account(&self, account: &ServiceAccount) -> Result<Credentials> {
        let body = account.encode_new()?;
        debug!(
            service_account = %account.access_key,
            target_user = %account.target_user,
            "creating service account"
        );

        let reply = self
            .execute(RequestData::put("add-service-accounts").json(body))
            .await?;
        Credentials::decode_reply(&reply, "add-service-accounts")
    }

    pub async fn read_service_account(&self, access_key: &str) -> Result<ServiceAccount> {
        require_access_key(access_key)?;
        let body = self
            .execute(RequestData::get("info-service-account").query("accessKey", access_key))
            .await?;
        ServiceAccount::decode_info(&body, access_key)
    }

    /// Update a service account, then read it back.
    ///
    /// A failed read-back after a successful update is
    /// [`Error::PartialFailure`]; the update itself has been applied.
    pub async fn update_service_account(
        &self,
        account: &ServiceAccount,
    ) -> Result<ServiceAccountUpdated> {
        require_access_key(&account.access_key)?;
        let body = account.encode_update()?;
        let mut steps = StepSequence::new();

        let updated = self
            .execute(
                RequestData::post("update-service-account")
                    .query("accessKey", &account.access_key)
                    .json(body),
            )
            .await
            .and_then(|reply| {
                // an empty reply means nothing was rotated
                if reply.is_empty() {
                    Ok(None)
                } else {
                    Credentials::decode_reply(&reply, "update-service-account").map(Some)
                }
            });
        let credentials = steps.record(Step::UpdateServiceAccount, updated)?;

        let read = self.read_service_account(&account.access_key).await;
        let account = steps.record(Step::ReadServiceAccount, read)?;

        debug!(service_account = %account.access_key, outcome = ?steps.outcome(), "service account updated");
        Ok(ServiceAccountUpdated {
            credentials,
            account,
        })
    }

    pub async fn delete_service_account(&self, access_key: &str) -> Result<()> {
        require_access_key(access_key)?;
        self.execute(RequestData::delete("delete-service-accounts").query("accessKey", access_key))
            .await?;
        Ok(())
    }
}
