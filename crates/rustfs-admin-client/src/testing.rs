//! In-memory admin server for client tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::Method;
use serde_json::{json, Value};

use rustfs_admin_auth::signature::verify_signature_v4;
use rustfs_admin_auth::SignatureV4;
use rustfs_admin_core::{AdminConfig, Result};

use crate::client::AdminClient;
use crate::transport::{RawResponse, SignedRequest, Transport};

pub const ACCESS_KEY: &str = "admin";
pub const SECRET_KEY: &str = "admin-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeUser {
    pub secret_key: String,
    pub status: String,
    pub policy: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    requests: Vec<SignedRequest>,
    overrides: HashMap<String, (u16, String)>,
    policies: HashMap<String, String>,
    users: HashMap<String, FakeUser>,
    service_accounts: HashMap<String, Value>,
}

/// Stateful stand-in for the admin API. Checks every signature against
/// [`SECRET_KEY`] and answers 403 on mismatch.
#[derive(Debug, Default)]
pub struct FakeAdminServer {
    state: Mutex<State>,
}

impl FakeAdminServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn client(self: &Arc<Self>) -> AdminClient {
        AdminClient::with_transport(
            AdminConfig::new("localhost:9000", ACCESS_KEY, SECRET_KEY),
            self.clone(),
        )
        .unwrap()
    }

    /// Answer every call to `operation` with a fixed reply
    pub fn respond(&self, operation: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert(operation.to_string(), (status, body.to_string()));
    }

    pub fn clear(&self, operation: &str) {
        self.state.lock().unwrap().overrides.remove(operation);
    }

    pub fn requests(&self) -> Vec<SignedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests().iter().map(operation_of).collect()
    }

    pub fn user(&self, access_key: &str) -> Option<FakeUser> {
        self.state.lock().unwrap().users.get(access_key).cloned()
    }

    pub fn add_policy(&self, name: &str, document: &str) {
        self.state
            .lock()
            .unwrap()
            .policies
            .insert(name.to_string(), document.to_string());
    }

    pub fn service_account(&self, access_key: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .service_accounts
            .get(access_key)
            .cloned()
    }
}

fn operation_of(request: &SignedRequest) -> String {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

fn signature_matches(request: &SignedRequest) -> bool {
    let (Some(auth), Some(hash)) = (
        request.headers.get("authorization"),
        request.headers.get("x-amz-content-sha256"),
    ) else {
        return false;
    };
    let Ok(sig) = SignatureV4::parse(auth) else {
        return false;
    };
    verify_signature_v4(
        request.method.as_str(),
        request.url.path(),
        request.url.query().unwrap_or(""),
        &request.headers,
        hash,
        SECRET_KEY,
        &sig,
    )
    .unwrap_or(false)
}

fn ok(body: Value) -> RawResponse {
    RawResponse::new(200, body.to_string())
}

fn not_found(what: &str) -> RawResponse {
    RawResponse::new(404, format!("{} not found", what))
}

impl State {
    fn handle(&mut self, request: &SignedRequest) -> RawResponse {
        let operation = operation_of(request);
        if let Some((status, body)) = self.overrides.get(&operation) {
            return RawResponse::new(*status, body.clone());
        }

        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let arg = |key: &str| query.get(key).cloned().unwrap_or_default();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        match (&request.method, operation.as_str()) {
            (&Method::GET, "is-admin") => ok(json!({ "is_admin": true })),

            (&Method::PUT, "add-canned-policy") => {
                let document = String::from_utf8_lossy(&request.body).into_owned();
                self.policies.insert(arg("name"), document);
                RawResponse::new(200, "")
            }
            (&Method::GET, "info-canned-policy") => match self.policies.get(&arg("name")) {
                Some(document) => ok(json!({ "policy_name": arg("name"), "policy": document })),
                None => not_found("policy"),
            },
            (&Method::DELETE, "remove-canned-policy") => match self.policies.remove(&arg("name")) {
                Some(_) => RawResponse::new(200, ""),
                None => not_found("policy"),
            },

            (&Method::PUT, "add-user") => {
                let access_key = arg("accessKey");
                if self.users.contains_key(&access_key) {
                    return RawResponse::new(409, "user already exists");
                }
                self.users.insert(
                    access_key,
                    FakeUser {
                        secret_key: body["secretKey"].as_str().unwrap_or_default().to_string(),
                        status: body["status"].as_str().unwrap_or_default().to_string(),
                        policy: None,
                    },
                );
                RawResponse::new(200, "")
            }
            (&Method::GET, "user-info") => match self.users.get(&arg("accessKey")) {
                Some(user) => ok(json!({
                    "status": user.status,
                    "policyName": user.policy.clone().unwrap_or_default(),
                    "memberOf": null,
                })),
                None => not_found("user"),
            },
            (&Method::PUT, "user-info") => match self.users.get_mut(&arg("accessKey")) {
                Some(user) => {
                    user.status = arg("status");
                    RawResponse::new(200, "")
                }
                None => not_found("user"),
            },
            (&Method::PUT, "set-user-or-group-policy") => {
                let policy = arg("policyName");
                if !self.policies.contains_key(&policy) {
                    return not_found("policy");
                }
                match self.users.get_mut(&arg("userOrGroup")) {
                    Some(user) => {
                        user.policy = Some(policy);
                        RawResponse::new(200, "")
                    }
                    None => not_found("user"),
                }
            }
            (&Method::DELETE, "remove-user") => match self.users.remove(&arg("accessKey")) {
                Some(_) => RawResponse::new(200, ""),
                None => not_found("user"),
            },

            (&Method::PUT, "add-service-accounts") => {
                let access_key = body["accessKey"].as_str().unwrap_or_default().to_string();
                let reply = json!({
                    "credentials": {
                        "accessKey": access_key,
                        "secretKey": body["secretKey"],
                        "expiration": body["expiration"],
                    }
                });
                self.service_accounts.insert(access_key, body);
                ok(reply)
            }
            (&Method::GET, "info-service-account") => {
                match self.service_accounts.get(&arg("accessKey")) {
                    Some(account) => ok(json!({
                        "parentUser": account.get("targetUser").cloned().unwrap_or(json!(ACCESS_KEY)),
                        "accountStatus": "on",
                        "name": account["name"],
                        "description": account["description"],
                        "expiration": account["expiration"],
                        "impliedPolicy": account["impliedPolicy"],
                        "policy": account.get("policy").cloned().unwrap_or(Value::Null),
                    })),
                    None => not_found("service account"),
                }
            }
            (&Method::POST, "update-service-account") => {
                match self.service_accounts.get_mut(&arg("accessKey")) {
                    Some(account) => {
                        account["name"] = body["newName"].clone();
                        account["description"] = body["newDescription"].clone();
                        if let Some(expiration) = body.get("newExpiration") {
                            account["expiration"] = expiration.clone();
                        }
                        RawResponse::new(200, "")
                    }
                    None => not_found("service account"),
                }
            }
            (&Method::DELETE, "delete-service-accounts") => {
                match self.service_accounts.remove(&arg("accessKey")) {
                    Some(_) => RawResponse::new(200, ""),
                    None => not_found("service account"),
                }
            }

            _ => RawResponse::new(404, "unknown admin operation"),
        }
    }
}

#[async_trait]
impl Transport for FakeAdminServer {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if !signature_matches(&request) {
            return Ok(RawResponse::new(403, "SignatureDoesNotMatch"));
        }
        Ok(state.handle(&request))
    }
}
