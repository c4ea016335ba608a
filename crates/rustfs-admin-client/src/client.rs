//! Admin API client

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use rustfs_admin_auth::{encode_query, Signer};
use rustfs_admin_core::{AdminConfig, Error, Result, ADMIN_API_ROOT, ADMIN_API_VERSION};
use rustfs_admin_crypto::sha256_hash;

use crate::request::RequestData;
use crate::transport::{ReqwestTransport, SignedRequest, Transport, TransportConfig};

/// Signed client for the RustFS admin API.
///
/// Cloning is cheap; configuration and transport are shared and never
/// mutated after construction.
#[derive(Clone)]
pub struct AdminClient {
    config: Arc<AdminConfig>,
    base_url: Url,
    signer: Signer,
    transport: Arc<dyn Transport>,
    cancel: Option<CancellationToken>,
}

#[derive(Deserialize)]
struct IsAdminReply {
    is_admin: bool,
}

impl AdminClient {
    /// Build a client with the default reqwest transport
    pub fn new(config: AdminConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(TransportConfig::from(&config))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over a caller-supplied transport
    pub fn with_transport(config: AdminConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let base_url = base_url(&config)?;
        let signer = Signer::new(&config.access_key, &config.secret_key, &config.region);

        debug!(endpoint = %base_url, "admin client ready");

        Ok(Self {
            config: Arc::new(config),
            base_url,
            signer,
            transport,
            cancel: None,
        })
    }

    /// A handle whose calls abort with [`Error::Cancelled`] once `token` fires
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// `scheme://host[:port]/rustfs/admin/v3`
    pub fn endpoint_url(&self) -> &Url {
        &self.base_url
    }

    /// Sign and send one request. A 200 reply yields its body; any other
    /// status is [`Error::Status`] carrying the body text verbatim.
    pub async fn execute(&self, request: RequestData) -> Result<Bytes> {
        let signed = self.sign(request)?;
        debug!(method = %signed.method, url = %signed.url, "admin request");

        let timeout = self.config.timeout();
        let exchange = tokio::time::timeout(timeout, self.transport.send(signed));

        let outcome = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Error::Cancelled),
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };
        let response = outcome.map_err(|_| Error::Timeout(timeout))??;

        if !response.is_success() {
            debug!(status = response.status, "admin request rejected");
            return Err(Error::Status {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response.body)
    }

    /// Whether the configured credentials carry admin rights.
    ///
    /// An unreadable reply is a decode error; the caller should treat it as
    /// `false`.
    pub async fn is_admin(&self) -> Result<bool> {
        let body = self.execute(RequestData::get("is-admin")).await?;
        serde_json::from_slice::<IsAdminReply>(&body)
            .map(|reply| reply.is_admin)
            .map_err(|source| Error::Decode {
                what: "is-admin",
                source,
            })
    }

    fn sign(&self, request: RequestData) -> Result<SignedRequest> {
        let mut url = self
            .base_url
            .join(&format!("{}/{}", ADMIN_API_VERSION, request.rel_path))
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", request.rel_path, e)))?;
        if !request.query.is_empty() {
            url.set_query(Some(&encode_query(&request.query)));
        }

        let mut headers = request.headers;
        if !request.body.is_empty() {
            headers.insert("content-length".to_string(), request.body.len().to_string());
        }

        let payload_hash = sha256_hash(&request.body);
        self.signer.sign(
            request.method.as_str(),
            &url,
            &mut headers,
            &payload_hash,
            Utc::now(),
        )?;

        Ok(SignedRequest {
            method: request.method,
            url,
            headers,
            body: request.body,
        })
    }
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.base_url.as_str())
            .field("signer", &self.signer)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Compose the admin API base URL, dropping a port that matches the scheme
fn base_url(config: &AdminConfig) -> Result<Url> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() || endpoint.contains(['/', '?', '#', ' ']) {
        return Err(Error::InvalidUrl(format!(
            "endpoint must be host[:port], got '{}'",
            config.endpoint
        )));
    }

    let (scheme, default_port) = if config.ssl {
        ("https", ":443")
    } else {
        ("http", ":80")
    };
    let host = endpoint.strip_suffix(default_port).unwrap_or(endpoint);

    let url = Url::parse(&format!(
        "{}://{}/{}/{}",
        scheme, host, ADMIN_API_ROOT, ADMIN_API_VERSION
    ))
    .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::InvalidUrl(format!("no host in '{}'", config.endpoint)));
    }
    Ok(url)
}
