//! Error taxonomy surfaced to callers of node operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::KeyError;
use crate::pagination::PaginationError;

/// Which secret a denial refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Master,
    Writer,
    Reader,
    Signature,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Master => write!(f, "master"),
            KeyKind::Writer => write!(f, "writer"),
            KeyKind::Reader => write!(f, "reader"),
            KeyKind::Signature => write!(f, "signature"),
        }
    }
}

/// Why an access check failed.
///
/// Absence of a key and presence of a wrong key are kept apart so callers can
///  tell "you need a key" from "that key is wrong". Neither variant says which
///  stored hash, if any, matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No applicable key was presented; `accepted` lists the kinds that would
    ///  have been checked, in priority order
    KeyRequired { accepted: Vec<KeyKind> },
    /// The highest-priority presented key did not verify
    InvalidKey(KeyKind),
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::KeyRequired { accepted } => {
                let names: Vec<String> = accepted.iter().map(|k| k.to_string()).collect();
                let joined = match names.split_last() {
                    Some((last, rest)) if !rest.is_empty() => {
                        format!("{} or {}", rest.join(", "), last)
                    }
                    Some((last, _)) => last.clone(),
                    None => "a".to_string(),
                };
                write!(f, "access denied, {} key is required", joined)
            }
            Denial::InvalidKey(kind) => write!(f, "invalid {} key", kind),
        }
    }
}

impl std::error::Error for Denial {}

/// Errors returned by [`Node`](crate::node::Node) operations.
///
/// Every variant except `Internal` is meant for the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// Referenced pool or signature does not exist
    #[error("{0}")]
    NotFound(String),
    /// Tag already taken, or message payload does not fit the pool
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    AccessDenied(#[from] Denial),
    /// Malformed fields, rule-table violations or bad pagination
    #[error("{0}")]
    InvalidInput(String),
    /// A collaborator failed; the detail is logged, never shown
    #[error("internal error: {0}")]
    Internal(String),
}

/// Generic text shown in place of an internal error
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

impl NodeError {
    /// Fold a list of violations into a single `InvalidInput` error
    ///  of the form `"<prefix>: a, b."`
    pub fn violations(prefix: &str, errors: &[String]) -> Self {
        NodeError::InvalidInput(format!("{}: {}.", prefix, errors.join(", ")))
    }

    /// Log a collaborator failure and wrap it
    pub fn internal(err: impl fmt::Display) -> Self {
        tracing::error!(error = %err, "internal node error");
        NodeError::Internal(err.to_string())
    }

    /// Message safe to hand to the caller
    pub fn public_message(&self) -> String {
        match self {
            NodeError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<PaginationError> for NodeError {
    fn from(err: PaginationError) -> Self {
        NodeError::InvalidInput(err.to_string())
    }
}

impl From<KeyError> for NodeError {
    fn from(err: KeyError) -> Self {
        NodeError::internal(err)
    }
}
