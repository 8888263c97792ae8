use std::fmt::{Debug, Display};

use async_trait::async_trait;
use uuid::Uuid;

use crate::pool::{Message, NewMessage, Pool};
use crate::signature::Signature;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    #[error("unhandled store provider error: {0}")]
    Provider(#[from] T),
    /// Another pool already uses this tag (or id)
    #[error("tag already in use: {0}")]
    TagTaken(String),
    /// A signature with this id already exists
    #[error("signature id already in use: {0}")]
    SignatureIdTaken(String),
    #[error("pool not found: {0}")]
    PoolNotFound(Uuid),
    #[error("signature not found: {0}")]
    SignatureNotFound(String),
}

/// Where pools, messages and signatures live between requests.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for
///  the store itself failing. Signatures referenced by pools and messages are
///  stored by id and resolved again on every load.
#[async_trait]
pub trait NodeStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Find a pool whose id (32 hex characters) or tag equals `identifier`
    async fn find_pool(&self, identifier: &str) -> Result<Option<Pool>, StoreError<Self::Error>>;

    /// All pools in creation order. Implementations may leave `messages` empty.
    async fn list_pools(&self) -> Result<Vec<Pool>, StoreError<Self::Error>>;

    async fn count_pools(&self) -> Result<u64, StoreError<Self::Error>>;

    /// Persist a new pool
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(StoreError::TagTaken)` - the tag collides with another pool's tag or id
    async fn create_pool(&self, pool: Pool) -> Result<Pool, StoreError<Self::Error>>;

    /// Persist changes to a pool's own fields (description, key hashes).
    ///  Messages are never written through here; see [`NodeStore::append_message`].
    async fn save_pool(&self, pool: &Pool) -> Result<(), StoreError<Self::Error>>;

    /// Append a message to a pool, assigning `index = count + 1`.
    ///
    /// Index assignment and the write happen as one atomic unit: two
    ///  concurrent appends to the same pool never get the same index.
    async fn append_message(
        &self,
        pool_id: Uuid,
        message: NewMessage,
    ) -> Result<Message, StoreError<Self::Error>>;

    /// Delete a pool and every message it owns. Returns whether it existed.
    async fn delete_pool(&self, pool_id: Uuid) -> Result<bool, StoreError<Self::Error>>;

    async fn find_signature(&self, id: &str) -> Result<Option<Signature>, StoreError<Self::Error>>;

    async fn count_signatures(&self) -> Result<u64, StoreError<Self::Error>>;

    /// Should fail with `Err(StoreError::SignatureIdTaken)` if the id exists
    async fn create_signature(
        &self,
        signature: Signature,
    ) -> Result<Signature, StoreError<Self::Error>>;

    async fn save_signature(&self, signature: &Signature) -> Result<(), StoreError<Self::Error>>;
}
