//! Canned IAM policy types and codec

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The only policy language version the server accepts on write
pub const POLICY_VERSION: &str = "2012-10-17";

/// Canned policy (AWS-compatible document plus its server-side name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    /// Policy name, carried only in the query string
    #[serde(skip)]
    pub name: String,

    /// Policy version (always "2012-10-17" on the wire)
    #[serde(default = "default_version")]
    pub version: String,

    /// Policy statements
    pub statement: Vec<Statement>,
}

fn default_version() -> String {
    POLICY_VERSION.to_string()
}

impl Policy {
    /// Create a new empty policy
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            statement: Vec::new(),
        }
    }

    /// Add a statement
    pub fn add_statement(mut self, statement: Statement) -> Self {
        self.statement.push(statement);
        self
    }

    /// Serialize the policy document for `add-canned-policy`.
    ///
    /// The version is forced to [`POLICY_VERSION`] and every statement must
    /// carry at least one action.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.name.is_empty() {
            return Err(Error::InvalidArgument("policy name must not be empty".into()));
        }
        if let Some(idx) = self.statement.iter().position(|s| s.action.is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "statement {} of policy '{}' has no actions",
                idx, self.name
            )));
        }

        let document = Policy {
            name: self.name.clone(),
            version: default_version(),
            statement: self.statement.clone(),
        };
        serde_json::to_vec(&document).map_err(Error::Encode)
    }

    /// Decode an `info-canned-policy` reply.
    ///
    /// `requested` is used as the name when the server leaves it blank.
    pub fn decode_reply(body: &[u8], requested: &str) -> Result<Self> {
        let reply: PolicyReply =
            serde_json::from_slice(body).map_err(|e| Error::decode("info-canned-policy", e))?;

        let name = if reply.policy_name.is_empty() {
            requested.to_string()
        } else {
            reply.policy_name
        };

        Ok(Policy {
            name,
            version: default_version(),
            statement: decode_statements(&reply.policy)?,
        })
    }
}

/// Policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Effect (Allow or Deny)
    pub effect: Effect,

    /// Actions, always a list on write
    pub action: Vec<String>,

    /// Resources
    #[serde(default)]
    pub resource: Vec<String>,
}

impl Statement {
    /// Create a new allow statement
    pub fn allow() -> Self {
        Self {
            effect: Effect::Allow,
            action: Vec::new(),
            resource: Vec::new(),
        }
    }

    /// Create a new deny statement
    pub fn deny() -> Self {
        Self {
            effect: Effect::Deny,
            action: Vec::new(),
            resource: Vec::new(),
        }
    }

    /// Set actions
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Set resources
    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource = resources.into_iter().map(Into::into).collect();
        self
    }
}

/// Effect type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => f.write_str("Allow"),
            Effect::Deny => f.write_str("Deny"),
        }
    }
}

impl FromStr for Effect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Allow" | "allow" => Ok(Effect::Allow),
            "Deny" | "deny" => Ok(Effect::Deny),
            other => Err(Error::InvalidArgument(format!(
                "effect must be Allow or Deny, got '{}'",
                other
            ))),
        }
    }
}

/// `info-canned-policy` envelope; the document itself is a JSON string
#[derive(Debug, Deserialize)]
struct PolicyReply {
    #[serde(default)]
    policy_name: String,
    policy: String,
}

/// Statement list whose `Action` is an array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListShape {
    statement: Vec<Statement>,
}

/// Statement list whose `Action` is a single string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScalarShape {
    statement: Vec<ScalarStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScalarStatement {
    effect: Effect,
    action: String,
    #[serde(default)]
    resource: Vec<String>,
}

impl From<ScalarStatement> for Statement {
    fn from(s: ScalarStatement) -> Self {
        Statement {
            effect: s.effect,
            action: vec![s.action],
            resource: s.resource,
        }
    }
}

/// Decode a stored policy document, trying the list-action shape first and
/// the scalar-action shape second.
pub fn decode_statements(document: &str) -> Result<Vec<Statement>> {
    let list = match serde_json::from_str::<ListShape>(document) {
        Ok(shape) => return Ok(shape.statement),
        Err(e) => e,
    };

    match serde_json::from_str::<ScalarShape>(document) {
        Ok(shape) => {
            tracing::trace!("policy document uses scalar Action form");
            Ok(shape.statement.into_iter().map(Statement::from).collect())
        }
        Err(scalar) => Err(Error::PolicyShape { list, scalar }),
    }
}
