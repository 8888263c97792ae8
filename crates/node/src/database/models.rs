//! Row shapes for the pools, messages and signatures tables.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use common::keys::KeyHash;
use common::pool::{MessageKind, Payload, Pool, PoolType};
use common::signature::Signature;

fn corrupt(what: impl std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(format!("corrupt row: {}", what).into())
}

#[derive(Debug, Clone, FromRow)]
pub struct SignatureRow {
    pub id: String,
    pub key_hash: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

impl From<SignatureRow> for Signature {
    fn from(row: SignatureRow) -> Self {
        Signature {
            id: row.id,
            key_hash: KeyHash::from_stored(row.key_hash),
            value: row.value,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PoolRow {
    pub id: String,
    pub tag: Option<String>,
    pub pool_type: String,
    pub description: Option<String>,
    pub public: bool,
    pub encrypted: bool,
    pub master_key_hash: String,
    pub writer_key_hash: Option<String>,
    pub reader_key_hash: Option<String>,
    pub creator_signature_id: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

impl PoolRow {
    /// Build the pool without messages; `creator_signature` is resolved by the caller
    pub fn into_pool(self, creator_signature: Option<Signature>) -> Result<Pool, sqlx::Error> {
        let id = Uuid::parse_str(&self.id).map_err(|e| corrupt(format!("pool id: {}", e)))?;
        let pool_type = self
            .pool_type
            .parse::<PoolType>()
            .map_err(|e| corrupt(format!("pool {}: {}", self.id, e)))?;

        Ok(Pool {
            id,
            tag: self.tag,
            pool_type,
            description: self.description,
            public: self.public,
            encrypted: self.encrypted,
            master_key_hash: KeyHash::from_stored(self.master_key_hash),
            writer_key_hash: self.writer_key_hash.map(KeyHash::from_stored),
            reader_key_hash: self.reader_key_hash.map(KeyHash::from_stored),
            creator_signature,
            created_at: self.created_at,
            messages: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub idx: i64,
    pub kind: String,
    pub text: Option<String>,
    pub ciphertext: Option<Vec<u8>>,
    pub nonce: Option<Vec<u8>>,
    pub tag: Option<Vec<u8>>,
    pub signature_id: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

impl MessageRow {
    pub fn payload(&self) -> Result<Payload, sqlx::Error> {
        let kind = self
            .kind
            .parse::<MessageKind>()
            .map_err(|e| corrupt(format!("message {}: {}", self.idx, e)))?;

        match kind {
            MessageKind::Plaintext => {
                let text = self
                    .text
                    .clone()
                    .ok_or_else(|| corrupt(format!("message {} has no text", self.idx)))?;
                Ok(Payload::Plaintext { text })
            }
            MessageKind::Encrypted => match (&self.ciphertext, &self.nonce, &self.tag) {
                (Some(ciphertext), Some(nonce), Some(tag)) => Ok(Payload::Encrypted {
                    ciphertext: ciphertext.clone(),
                    nonce: nonce.clone(),
                    tag: tag.clone(),
                }),
                _ => Err(corrupt(format!(
                    "message {} is missing encrypted fields",
                    self.idx
                ))),
            },
        }
    }
}
