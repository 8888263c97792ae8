//! Outward shapes of pools, messages and signatures.
//!
//! None of these carry a key or a key hash; whether a key is needed is only
//!  ever reported as a boolean.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::pool::{format_pool_id, Message, MessageFields, MessageKind, Pool, PoolType};
use crate::signature::Signature;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub id: String,
    pub value: String,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<&Signature> for SignatureInfo {
    fn from(signature: &Signature) -> Self {
        Self {
            id: signature.id.clone(),
            value: signature.value.clone(),
            description: signature.description.clone(),
            created_at: signature.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub id: String,
    pub tag: Option<String>,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
    pub public: bool,
    pub encrypted: bool,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub creator_signature: Option<SignatureInfo>,
    pub write_key_required: bool,
    pub read_key_required: bool,
}

impl From<&Pool> for PoolInfo {
    fn from(pool: &Pool) -> Self {
        Self {
            id: format_pool_id(&pool.id),
            tag: pool.tag.clone(),
            pool_type: pool.pool_type,
            public: pool.public,
            encrypted: pool.encrypted,
            description: pool.description.clone(),
            created_at: pool.created_at,
            creator_signature: pool.creator_signature.as_ref().map(SignatureInfo::from),
            write_key_required: pool.write_key_required(),
            read_key_required: pool.read_key_required(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub index: u64,
    #[serde(rename = "type")]
    pub message_type: MessageKind,
    #[serde(flatten)]
    pub fields: MessageFields,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub signature: Option<SignatureInfo>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            index: message.index,
            message_type: message.payload.kind(),
            fields: message.payload.to_fields(),
            created_at: message.created_at,
            signature: message.signature.as_ref().map(SignatureInfo::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolList {
    /// Listable pools before pagination
    pub total: u64,
    pub count: u64,
    pub pools: Vec<PoolInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    /// Messages in the pool before pagination
    pub total: u64,
    pub count: u64,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub version: String,
    pub pools_count: u64,
    pub signatures_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::test_verifier;
    use crate::pool::test_utils::pool;

    #[test]
    fn test_pool_info_never_exposes_hashes() {
        let verifier = test_verifier();
        let pool = pool(
            &verifier,
            PoolType::Chat,
            false,
            "master-key",
            Some("writer-key"),
            Some("reader-key"),
        );
        let info = PoolInfo::from(&pool);
        assert!(info.write_key_required);
        assert!(info.read_key_required);

        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("key_hash"));
        assert!(json.contains("\"type\":\"chat\""));
    }

    #[test]
    fn test_message_view_is_flat() {
        let message = Message {
            index: 3,
            created_at: None,
            payload: crate::pool::Payload::Plaintext { text: "hi".into() },
            signature: None,
        };
        let json = serde_json::to_value(MessageView::from(&message)).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["type"], "plaintext");
        assert_eq!(json["text"], "hi");
        assert!(json.get("ciphertext").is_none());
    }
}
