//! Unsigned admin request descriptor

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;

/// One admin API call before signing
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: Method,
    /// Path below `/rustfs/admin/v3`, without a leading slash
    pub rel_path: String,
    /// Query parameters, sorted by key
    pub query: BTreeMap<String, Vec<String>>,
    /// Extra headers (lower-case names)
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl RequestData {
    pub fn new(method: Method, rel_path: impl Into<String>) -> Self {
        Self {
            method,
            rel_path: rel_path.into(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(rel_path: impl Into<String>) -> Self {
        Self::new(Method::GET, rel_path)
    }

    pub fn put(rel_path: impl Into<String>) -> Self {
        Self::new(Method::PUT, rel_path)
    }

    pub fn post(rel_path: impl Into<String>) -> Self {
        Self::new(Method::POST, rel_path)
    }

    pub fn delete(rel_path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, rel_path)
    }

    /// Set a query parameter, replacing earlier values for the key
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), vec![value.into()]);
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        self.body = Bytes::from(body);
        self
    }
}
