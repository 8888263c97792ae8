//! Authorization decisions for pool operations.
//!
//! Every operation builds an explicit, priority-ordered list of
//!  `(presented key, stored hash, kind)` candidates. Candidates whose hash is
//!  not stored on the pool do not apply and are skipped. The first applicable
//!  candidate the caller actually presented is the only one verified; any
//!  lower-priority keys on the same request are ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Pool;
use crate::error::{Denial, KeyKind};
use crate::keys::{KeyHash, KeyVerifier};

/// Plaintext keys carried by a single request
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PresentedKeys {
    pub master: Option<String>,
    pub writer: Option<String>,
    pub reader: Option<String>,
}

impl PresentedKeys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn master(key: impl Into<String>) -> Self {
        Self {
            master: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn writer(key: impl Into<String>) -> Self {
        Self {
            writer: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn reader(key: impl Into<String>) -> Self {
        Self {
            reader: Some(key.into()),
            ..Default::default()
        }
    }
}

impl fmt::Debug for PresentedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentedKeys")
            .field("master", &self.master.is_some())
            .field("writer", &self.writer.is_some())
            .field("reader", &self.reader.is_some())
            .finish()
    }
}

/// What decides whether a pool's metadata is readable without a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataVisibility {
    /// Open iff the pool was created `public`
    #[default]
    PublicFlag,
    /// Open iff the pool stores no reader key
    KeyPresence,
}

impl fmt::Display for MetadataVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataVisibility::PublicFlag => write!(f, "public_flag"),
            MetadataVisibility::KeyPresence => write!(f, "key_presence"),
        }
    }
}

impl FromStr for MetadataVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public_flag" | "public-flag" => Ok(MetadataVisibility::PublicFlag),
            "key_presence" | "key-presence" => Ok(MetadataVisibility::KeyPresence),
            other => Err(format!("unknown metadata visibility: {}", other)),
        }
    }
}

/// Deployment-level access choices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    pub metadata: MetadataVisibility,
    /// Accept a valid master key (checked before the reader key) when
    ///  reading messages
    #[serde(default)]
    pub master_reads_messages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadMetadata,
    ReadMessages,
    Write,
    Administer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ReadMetadata => write!(f, "read_metadata"),
            Operation::ReadMessages => write!(f, "read_messages"),
            Operation::Write => write!(f, "write"),
            Operation::Administer => write!(f, "administer"),
        }
    }
}

struct Candidate<'a> {
    presented: Option<&'a str>,
    stored: Option<&'a KeyHash>,
    kind: KeyKind,
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    verifier: KeyVerifier,
    policy: AccessPolicy,
}

impl AccessGuard {
    pub fn new(verifier: KeyVerifier, policy: AccessPolicy) -> Self {
        Self { verifier, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Whether anyone may read `pool`'s metadata without presenting a key
    pub fn metadata_is_open(&self, pool: &Pool) -> bool {
        match self.policy.metadata {
            MetadataVisibility::PublicFlag => pool.public,
            MetadataVisibility::KeyPresence => pool.reader_key_hash.is_none(),
        }
    }

    /// Whether `keys` are enough to read `pool`'s messages
    pub fn can_read(&self, pool: &Pool, keys: &PresentedKeys) -> bool {
        self.decide(Operation::ReadMessages, pool, keys).is_ok()
    }

    /// Allow or deny `op` on `pool` for a request carrying `keys`
    pub fn authorize(
        &self,
        op: Operation,
        pool: &Pool,
        keys: &PresentedKeys,
    ) -> Result<(), Denial> {
        self.decide(op, pool, keys).map_err(|denial| {
            tracing::warn!(pool = %pool.id, operation = %op, reason = %denial, "access denied");
            denial
        })
    }

    fn decide(&self, op: Operation, pool: &Pool, keys: &PresentedKeys) -> Result<(), Denial> {
        let master = Candidate {
            presented: keys.master.as_deref(),
            stored: Some(&pool.master_key_hash),
            kind: KeyKind::Master,
        };
        let writer = Candidate {
            presented: keys.writer.as_deref(),
            stored: pool.writer_key_hash.as_ref(),
            kind: KeyKind::Writer,
        };
        let reader = Candidate {
            presented: keys.reader.as_deref(),
            stored: pool.reader_key_hash.as_ref(),
            kind: KeyKind::Reader,
        };

        let candidates = match op {
            Operation::ReadMetadata => {
                if self.metadata_is_open(pool) {
                    return Ok(());
                }
                vec![master, writer, reader]
            }
            Operation::ReadMessages => {
                if pool.reader_key_hash.is_none() {
                    return Ok(());
                }
                if self.policy.master_reads_messages {
                    vec![master, reader]
                } else {
                    vec![reader]
                }
            }
            // master never stands in for the writer key
            Operation::Write => {
                if pool.writer_key_hash.is_none() {
                    return Ok(());
                }
                vec![writer]
            }
            Operation::Administer => vec![master],
        };

        self.check_in_order(candidates)
    }

    fn check_in_order(&self, candidates: Vec<Candidate<'_>>) -> Result<(), Denial> {
        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let Some(stored) = candidate.stored else {
                continue;
            };
            if let Some(secret) = candidate.presented {
                return if self.verifier.verify(secret, stored) {
                    Ok(())
                } else {
                    Err(Denial::InvalidKey(candidate.kind))
                };
            }
            accepted.push(candidate.kind);
        }
        Err(Denial::KeyRequired { accepted })
    }
}
