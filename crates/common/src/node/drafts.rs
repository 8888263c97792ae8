//! Caller-supplied inputs for node operations.
//!
//! These carry plaintext keys, so none of them implement `Debug`.

use serde::{Deserialize, Serialize};

use crate::pool::MessageFields;
use crate::signature::SignatureClaim;

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PoolDraft {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub encrypted: bool,
    pub master_key: String,
    #[serde(default)]
    pub writer_key: Option<String>,
    #[serde(default)]
    pub reader_key: Option<String>,
    #[serde(default)]
    pub creator_signature: Option<SignatureClaim>,
    #[serde(default)]
    pub hide_creation_date: bool,
}

/// Changes to a pool, authorized by its current master key
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PoolUpdate {
    pub master_key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub new_master_key: Option<String>,
    /// Only for pool types that carry a writer key
    #[serde(default)]
    pub new_writer_key: Option<String>,
    /// Only for pool types that carry a reader key
    #[serde(default)]
    pub new_reader_key: Option<String>,
}

impl PoolUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.new_master_key.is_none()
            && self.new_writer_key.is_none()
            && self.new_reader_key.is_none()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct MessageDraft {
    #[serde(flatten)]
    pub fields: MessageFields,
    #[serde(default)]
    pub writer_key: Option<String>,
    #[serde(default)]
    pub signature: Option<SignatureClaim>,
    #[serde(default)]
    pub hide_date: bool,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignatureDraft {
    pub value: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hide_creation_date: bool,
}

/// Changes to a signature, authorized by its current key
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignatureUpdate {
    pub key: String,
    #[serde(default)]
    pub new_key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
