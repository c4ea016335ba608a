//! HTTP transport for signed admin requests
//!
//! The client hands fully signed requests to a [`Transport`]. The default
//! implementation is backed by reqwest; tests substitute an in-memory server.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use rustfs_admin_core::{AdminConfig, Error, Result};

/// A request ready to go on the wire
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    /// Lower-case header names, including `authorization`
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

/// Status and body of a completed exchange, whatever the status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The admin API answers every successful call with exactly 200
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform one round trip. Only network-level failures are errors here;
    /// status classification belongs to the caller.
    async fn send(&self, request: SignedRequest) -> Result<RawResponse>;
}

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Enable TLS certificate verification
    pub verify_tls: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            verify_tls: true,
        }
    }
}

impl From<&AdminConfig> for TransportConfig {
    fn from(config: &AdminConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            verify_tls: !config.insecure,
        }
    }
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout)
        } else {
            Error::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse> {
        let mut builder = self.client.request(request.method, request.url);

        // reqwest derives both from the URL and body; the values match what was signed
        for (name, value) in &request.headers {
            if name == "host" || name == "content-length" {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!(status, bytes = body.len(), "admin response");

        Ok(RawResponse { status, body })
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish()
    }
}
