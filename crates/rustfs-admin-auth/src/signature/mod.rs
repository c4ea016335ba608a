//! AWS Signature V4 implementation

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rustfs_admin_core::{Error, Result, SIGNING_SERVICE};
use rustfs_admin_crypto::{derive_signing_key, hmac_sha256_hex, sha256_hash};
use tracing::trace;
use url::Url;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub const HOST_HEADER: &str = "host";
pub const AMZ_DATE_HEADER: &str = "x-amz-date";
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Everything except the RFC 3986 unreserved characters
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureV4 {
    pub access_key: String,
    pub signature: String,
    pub signed_headers: Vec<String>,
    pub date: DateTime<Utc>,
    pub region: String,
    pub service: String,
}

impl SignatureV4 {
    /// Parse Authorization header
    pub fn parse(auth_header: &str) -> Result<Self> {
        // Format: AWS4-HMAC-SHA256 Credential=.../date/region/s3/aws4_request, SignedHeaders=..., Signature=...
        let rest = auth_header
            .strip_prefix("AWS4-HMAC-SHA256 ")
            .ok_or_else(|| Error::InvalidArgument("Invalid authorization header".into()))?;

        let mut credential = None;
        let mut signed_headers = None;
        let mut signature = None;

        for part in rest.split(", ") {
            if let Some(val) = part.strip_prefix("Credential=") {
                credential = Some(val);
            } else if let Some(val) = part.strip_prefix("SignedHeaders=") {
                signed_headers = Some(val);
            } else if let Some(val) = part.strip_prefix("Signature=") {
                signature = Some(val);
            }
        }

        let credential =
            credential.ok_or_else(|| Error::InvalidArgument("Missing Credential".into()))?;
        let signed_headers =
            signed_headers.ok_or_else(|| Error::InvalidArgument("Missing SignedHeaders".into()))?;
        let signature =
            signature.ok_or_else(|| Error::InvalidArgument("Missing Signature".into()))?;

        // access_key/date/region/service/aws4_request
        let cred_parts: Vec<&str> = credential.split('/').collect();
        if cred_parts.len() != 5 {
            return Err(Error::InvalidArgument("Invalid credential format".into()));
        }

        let date =
            NaiveDateTime::parse_from_str(&format!("{}T000000Z", cred_parts[1]), AMZ_DATE_FORMAT)
                .map_err(|_| Error::InvalidArgument("Invalid date format".into()))?
                .and_utc();

        Ok(SignatureV4 {
            access_key: cred_parts[0].to_string(),
            signature: signature.to_string(),
            signed_headers: signed_headers.split(';').map(String::from).collect(),
            date,
            region: cred_parts[2].to_string(),
            service: cred_parts[3].to_string(),
        })
    }

    /// Render as an `Authorization` header value
    pub fn to_header(&self) -> String {
        format!(
            "{} Credential={}/{}/{}/{}/aws4_request, SignedHeaders={}, Signature={}",
            ALGORITHM,
            self.access_key,
            self.date.format("%Y%m%d"),
            self.region,
            self.service,
            self.signed_headers.join(";"),
            self.signature
        )
    }
}

/// Signs admin requests with one fixed credential and scope
#[derive(Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
    region: String,
    service: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &self.access_key)
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl Signer {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: SIGNING_SERVICE.to_string(),
        }
    }

    /// Sign a request in place.
    ///
    /// `headers` must use lower-case names. The host, payload hash and date
    /// headers are inserted, every header present is signed, and the
    /// resulting `authorization` header is added. The output depends only on
    /// the inputs, so a fixed `at` yields a fixed signature.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &mut BTreeMap<String, String>,
        payload_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<SignatureV4> {
        let amz_date = at.format(AMZ_DATE_FORMAT).to_string();

        headers.remove(AUTHORIZATION_HEADER);
        headers
            .entry(HOST_HEADER.to_string())
            .or_insert(host_header(url)?);
        headers.insert(CONTENT_SHA256_HEADER.to_string(), payload_hash.to_string());
        headers.insert(AMZ_DATE_HEADER.to_string(), amz_date.clone());

        let signed_headers: Vec<String> = headers.keys().cloned().collect();
        let signature = compute_signature(
            &CanonicalRequest {
                method,
                path: url.path(),
                query: url.query().unwrap_or(""),
                headers,
                signed_headers: &signed_headers,
                payload_hash,
            },
            &amz_date,
            &self.secret_key,
            &self.region,
            &self.service,
        );

        let sig = SignatureV4 {
            access_key: self.access_key.clone(),
            signature,
            signed_headers,
            date: at,
            region: self.region.clone(),
            service: self.service.clone(),
        };
        headers.insert(AUTHORIZATION_HEADER.to_string(), sig.to_header());
        Ok(sig)
    }
}

/// Verify AWS Signature V4
pub fn verify_signature_v4(
    method: &str,
    uri: &str,
    query_string: &str,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
    secret_key: &str,
    sig: &SignatureV4,
) -> Result<bool> {
    let amz_date = headers
        .get(AMZ_DATE_HEADER)
        .ok_or_else(|| Error::InvalidArgument("Missing x-amz-date header".into()))?;

    let calculated = compute_signature(
        &CanonicalRequest {
            method,
            path: uri,
            query: query_string,
            headers,
            signed_headers: &sig.signed_headers,
            payload_hash,
        },
        amz_date,
        secret_key,
        &sig.region,
        &sig.service,
    );

    trace!("Calculated signature: {}", calculated);
    trace!("Provided signature: {}", sig.signature);

    Ok(calculated == sig.signature)
}

/// Encode query parameters the way the canonical request expects them:
/// keys sorted, every value percent-encoded with the unreserved set.
pub fn encode_query(params: &BTreeMap<String, Vec<String>>) -> String {
    let mut pairs = Vec::new();
    for (key, values) in params {
        let key = utf8_percent_encode(key, URI_ENCODE_SET);
        for value in values {
            pairs.push(format!("{}={}", key, utf8_percent_encode(value, URI_ENCODE_SET)));
        }
    }
    pairs.join("&")
}

/// `host[:port]` as sent in the Host header; default ports are omitted
pub fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(format!("no host in {}", url)))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

struct CanonicalRequest<'a> {
    method: &'a str,
    path: &'a str,
    query: &'a str,
    headers: &'a BTreeMap<String, String>,
    signed_headers: &'a [String],
    payload_hash: &'a str,
}

fn compute_signature(
    request: &CanonicalRequest<'_>,
    amz_date: &str,
    secret_key: &str,
    region: &str,
    service: &str,
) -> String {
    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        uri_encode_path(request.path),
        canonicalize_query_string(request.query),
        canonicalize_headers(request.headers, request.signed_headers),
        request.signed_headers.join(";"),
        request.payload_hash
    );

    trace!("Canonical request:\n{}", canonical_request);

    let date_stamp = &amz_date[..8.min(amz_date.len())];
    let credential_scope = format!("{}/{}/{}/aws4_request", date_stamp, region, service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        credential_scope,
        sha256_hash(canonical_request.as_bytes())
    );

    trace!("String to sign:\n{}", string_to_sign);

    let signing_key = derive_signing_key(secret_key, date_stamp, region, service);
    hmac_sha256_hex(&signing_key, string_to_sign.as_bytes())
}

fn uri_encode_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn canonicalize_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| p.split_once('=').unwrap_or((p, "")))
        .collect();

    params.sort();

    params
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonicalize_headers(headers: &BTreeMap<String, String>, signed_headers: &[String]) -> String {
    let mut result = String::new();

    for header in signed_headers {
        let header_lower = header.to_lowercase();
        if let Some(value) = headers.get(&header_lower) {
            result.push_str(&header_lower);
            result.push(':');
            result.push_str(value.trim());
            result.push('\n');
        }
    }

    result
}
