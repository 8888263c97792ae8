mod access;
mod kind;
mod message_rules;
mod type_rules;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::keys::KeyHash;
use crate::signature::Signature;

pub use access::{AccessGuard, AccessPolicy, MetadataVisibility, Operation, PresentedKeys};
pub use kind::{MessageKind, PoolType};
pub use message_rules::{check_compatibility, shape_violations, MessageFields};
pub use type_rules::{row, violations, KeyLayout, PoolTypeRow, Requirement};

/// Render a pool id the way it is shown to callers: 32 lowercase hex characters
pub fn format_pool_id(id: &Uuid) -> String {
    id.simple().to_string()
}

/// A typed, key-protected container of messages.
///
/// `messages` is an arena: entries are only ever pushed, and an entry's
///  `index` is its 1-based position at the time it was pushed.
#[derive(Debug, Clone)]
pub struct Pool {
    pub id: Uuid,
    pub tag: Option<String>,
    pub pool_type: PoolType,
    pub description: Option<String>,
    pub public: bool,
    pub encrypted: bool,
    pub master_key_hash: KeyHash,
    pub writer_key_hash: Option<KeyHash>,
    pub reader_key_hash: Option<KeyHash>,
    pub creator_signature: Option<Signature>,
    pub created_at: Option<OffsetDateTime>,
    pub messages: Vec<Message>,
}

impl Pool {
    /// Whether `identifier` names this pool, by id or by tag
    pub fn matches(&self, identifier: &str) -> bool {
        format_pool_id(&self.id) == identifier || self.tag.as_deref() == Some(identifier)
    }

    pub fn write_key_required(&self) -> bool {
        self.writer_key_hash.is_some()
    }

    pub fn read_key_required(&self) -> bool {
        self.reader_key_hash.is_some()
    }

    /// Index the next appended message will receive
    pub fn next_index(&self) -> u64 {
        self.messages.len() as u64 + 1
    }

    /// Push a message at `next_index` and return it
    pub fn append(&mut self, message: NewMessage) -> &Message {
        let index = self.next_index();
        self.messages.push(message.at_index(index));
        &self.messages[self.messages.len() - 1]
    }
}

/// Message body. Encrypted fields are opaque bytes; nothing here decrypts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Plaintext {
        text: String,
    },
    Encrypted {
        ciphertext: Vec<u8>,
        nonce: Vec<u8>,
        tag: Vec<u8>,
    },
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Plaintext { .. } => MessageKind::Plaintext,
            Payload::Encrypted { .. } => MessageKind::Encrypted,
        }
    }

    /// Spread the payload back into wire fields
    pub fn to_fields(&self) -> MessageFields {
        match self {
            Payload::Plaintext { text } => MessageFields {
                text: Some(text.clone()),
                ..Default::default()
            },
            Payload::Encrypted {
                ciphertext,
                nonce,
                tag,
            } => MessageFields {
                text: None,
                ciphertext: Some(ciphertext.clone()),
                nonce: Some(nonce.clone()),
                tag: Some(tag.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub index: u64,
    pub created_at: Option<OffsetDateTime>,
    pub payload: Payload,
    pub signature: Option<Signature>,
}

/// A validated message waiting for its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub created_at: Option<OffsetDateTime>,
    pub payload: Payload,
    pub signature: Option<Signature>,
}

impl NewMessage {
    pub fn at_index(self, index: u64) -> Message {
        Message {
            index,
            created_at: self.created_at,
            payload: self.payload,
            signature: self.signature,
        }
    }
}
