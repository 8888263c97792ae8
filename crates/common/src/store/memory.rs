use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::provider::{NodeStore, StoreError};
use crate::pool::{format_pool_id, Message, NewMessage, Pool};
use crate::signature::Signature;

/// In-memory node store, used by tests and embedders
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// Pools in creation order
    pools: Vec<Pool>,
    signatures: HashMap<String, Signature>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>, StoreError<MemoryStoreError>> {
        self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>, StoreError<MemoryStoreError>> {
        self.inner.write().map_err(|e| {
            StoreError::Provider(MemoryStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl MemoryStoreInner {
    fn refresh(&self, signature: &Option<Signature>) -> Option<Signature> {
        signature
            .as_ref()
            .map(|s| self.signatures.get(&s.id).cloned().unwrap_or_else(|| s.clone()))
    }

    /// Copy a pool out with its signature references re-resolved
    fn load(&self, pool: &Pool) -> Pool {
        let mut loaded = pool.clone();
        loaded.creator_signature = self.refresh(&pool.creator_signature);
        for message in loaded.messages.iter_mut() {
            message.signature = self.refresh(&message.signature);
        }
        loaded
    }

    fn position(&self, pool_id: Uuid) -> Option<usize> {
        self.pools.iter().position(|p| p.id == pool_id)
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn find_pool(&self, identifier: &str) -> Result<Option<Pool>, StoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner
            .pools
            .iter()
            .find(|p| p.matches(identifier))
            .map(|p| inner.load(p)))
    }

    async fn list_pools(&self) -> Result<Vec<Pool>, StoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner.pools.iter().map(|p| inner.load(p)).collect())
    }

    async fn count_pools(&self) -> Result<u64, StoreError<Self::Error>> {
        Ok(self.read()?.pools.len() as u64)
    }

    async fn create_pool(&self, pool: Pool) -> Result<Pool, StoreError<Self::Error>> {
        let mut inner = self.write()?;

        if let Some(tag) = &pool.tag {
            if inner.pools.iter().any(|p| p.matches(tag)) {
                return Err(StoreError::TagTaken(tag.clone()));
            }
        }
        let id = format_pool_id(&pool.id);
        if inner.pools.iter().any(|p| p.matches(&id)) {
            return Err(StoreError::TagTaken(id));
        }

        inner.pools.push(pool.clone());
        Ok(pool)
    }

    async fn save_pool(&self, pool: &Pool) -> Result<(), StoreError<Self::Error>> {
        let mut inner = self.write()?;
        let position = inner
            .position(pool.id)
            .ok_or(StoreError::PoolNotFound(pool.id))?;

        // keep whatever messages were appended since `pool` was loaded
        let stored = &mut inner.pools[position];
        let messages = std::mem::take(&mut stored.messages);
        *stored = Pool {
            messages,
            ..pool.clone()
        };
        Ok(())
    }

    async fn append_message(
        &self,
        pool_id: Uuid,
        message: NewMessage,
    ) -> Result<Message, StoreError<Self::Error>> {
        let mut inner = self.write()?;
        let position = inner
            .position(pool_id)
            .ok_or(StoreError::PoolNotFound(pool_id))?;
        Ok(inner.pools[position].append(message).clone())
    }

    async fn delete_pool(&self, pool_id: Uuid) -> Result<bool, StoreError<Self::Error>> {
        let mut inner = self.write()?;
        match inner.position(pool_id) {
            Some(position) => {
                inner.pools.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_signature(&self, id: &str) -> Result<Option<Signature>, StoreError<Self::Error>> {
        Ok(self.read()?.signatures.get(id).cloned())
    }

    async fn count_signatures(&self) -> Result<u64, StoreError<Self::Error>> {
        Ok(self.read()?.signatures.len() as u64)
    }

    async fn create_signature(
        &self,
        signature: Signature,
    ) -> Result<Signature, StoreError<Self::Error>> {
        let mut inner = self.write()?;
        if inner.signatures.contains_key(&signature.id) {
            return Err(StoreError::SignatureIdTaken(signature.id));
        }
        inner
            .signatures
            .insert(signature.id.clone(), signature.clone());
        Ok(signature)
    }

    async fn save_signature(&self, signature: &Signature) -> Result<(), StoreError<Self::Error>> {
        let mut inner = self.write()?;
        match inner.signatures.get_mut(&signature.id) {
            Some(stored) => {
                *stored = signature.clone();
                Ok(())
            }
            None => Err(StoreError::SignatureNotFound(signature.id.clone())),
        }
    }
}
