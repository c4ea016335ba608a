//! Error types for the RustFS admin client

use std::time::Duration;

use thiserror::Error;

use crate::types::Step;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Construction Errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    // Transport Errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    // Server Errors
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },

    // Decode Errors
    #[error("Failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Policy document matches neither statement shape (action list: {list}; action string: {scalar})"
    )]
    PolicyShape {
        list: serde_json::Error,
        scalar: serde_json::Error,
    },

    // Multi-step Errors
    #[error("{failed} failed after {} step(s) succeeded: {source}", completed.len())]
    PartialFailure {
        completed: Vec<Step>,
        failed: Step,
        #[source]
        source: Box<Error>,
    },
}

/// Broad error class, one per row of the client's error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Construction,
    Transport,
    Status,
    Decode,
    PartialFailure,
}

/// What a reconciling caller may infer about the remote resource after a
/// mutating call returned an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    /// Nothing was sent to the server
    Unchanged,
    /// The request may or may not have been applied
    Unconfirmed,
    /// The server accepted the request but the reply was unreadable
    Mutated,
    /// Some steps of a multi-step operation were applied
    PartiallyMutated,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidUrl(_)
            | Error::InvalidArgument(_)
            | Error::Encode(_) => ErrorKind::Construction,

            Error::Transport(_) | Error::Timeout(_) | Error::Cancelled => ErrorKind::Transport,

            Error::Status { .. } => ErrorKind::Status,

            Error::Decode { .. } | Error::PolicyShape { .. } => ErrorKind::Decode,

            Error::PartialFailure { .. } => ErrorKind::PartialFailure,
        }
    }

    pub fn remote_state(&self) -> RemoteState {
        match self.kind() {
            ErrorKind::Construction => RemoteState::Unchanged,
            ErrorKind::Transport | ErrorKind::Status => RemoteState::Unconfirmed,
            ErrorKind::Decode => RemoteState::Mutated,
            ErrorKind::PartialFailure => RemoteState::PartiallyMutated,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// HTTP status of a server rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { what, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<bool>("nope").unwrap_err()
    }

    #[test]
    fn test_status_error_keeps_server_text() {
        let err = Error::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_remote_state_classification() {
        assert_eq!(
            Error::InvalidConfig("x".into()).remote_state(),
            RemoteState::Unchanged
        );
        assert_eq!(Error::Cancelled.remote_state(), RemoteState::Unconfirmed);
        assert_eq!(
            Error::Timeout(Duration::from_secs(1)).remote_state(),
            RemoteState::Unconfirmed
        );
        assert_eq!(
            Error::decode("user-info", json_error()).remote_state(),
            RemoteState::Mutated
        );

        let partial = Error::PartialFailure {
            completed: vec![Step::AddUser],
            failed: Step::AttachPolicy,
            source: Box::new(Error::Transport("connection reset".into())),
        };
        assert_eq!(partial.remote_state(), RemoteState::PartiallyMutated);
        assert!(partial.to_string().contains("connection reset"));
    }

    #[test]
    fn test_policy_shape_reports_both_failures() {
        let err = Error::PolicyShape {
            list: serde_json::from_str::<Vec<String>>("\"a\"").unwrap_err(),
            scalar: serde_json::from_str::<String>("[1]").unwrap_err(),
        };
        let text = err.to_string();
        assert!(text.contains("action list"));
        assert!(text.contains("action string"));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
