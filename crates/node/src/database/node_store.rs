use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use common::pool::{Message, NewMessage, Pool};
use common::signature::Signature;
use common::store::{NodeStore, StoreError};

use super::models::PoolRow;
use super::pool_queries::PoolInsert;
use super::Database;

/// Resolves signature ids to rows, at most once per id per load
#[derive(Default)]
struct SignatureCache(HashMap<String, Option<Signature>>);

impl SignatureCache {
    async fn resolve(
        &mut self,
        db: &Database,
        id: Option<&str>,
    ) -> Result<Option<Signature>, sqlx::Error> {
        let Some(id) = id else {
            return Ok(None);
        };
        if let Some(found) = self.0.get(id) {
            return Ok(found.clone());
        }
        let found = db.signature_row(id).await?.map(Signature::from);
        if found.is_none() {
            tracing::warn!(signature = %id, "pool references a missing signature");
        }
        self.0.insert(id.to_string(), found.clone());
        Ok(found)
    }
}

impl Database {
    async fn load_pool(
        &self,
        row: PoolRow,
        cache: &mut SignatureCache,
        with_messages: bool,
    ) -> Result<Pool, sqlx::Error> {
        let creator = cache
            .resolve(self, row.creator_signature_id.as_deref())
            .await?;
        let mut pool = row.into_pool(creator)?;
        if !with_messages {
            return Ok(pool);
        }

        for row in self.message_rows(&pool.id).await? {
            let signature = cache.resolve(self, row.signature_id.as_deref()).await?;
            pool.messages.push(Message {
                index: row.idx as u64,
                created_at: row.created_at,
                payload: row.payload()?,
                signature,
            });
        }
        Ok(pool)
    }
}

#[async_trait]
impl NodeStore for Database {
    type Error = sqlx::Error;

    async fn find_pool(&self, identifier: &str) -> Result<Option<Pool>, StoreError<Self::Error>> {
        let Some(row) = self.pool_row(identifier).await? else {
            return Ok(None);
        };
        let pool = self
            .load_pool(row, &mut SignatureCache::default(), true)
            .await?;
        Ok(Some(pool))
    }

    async fn list_pools(&self) -> Result<Vec<Pool>, StoreError<Self::Error>> {
        let mut cache = SignatureCache::default();
        let mut pools = Vec::new();
        for row in self.pool_rows().await? {
            pools.push(self.load_pool(row, &mut cache, false).await?);
        }
        Ok(pools)
    }

    async fn count_pools(&self) -> Result<u64, StoreError<Self::Error>> {
        Ok(self.count_pool_rows().await? as u64)
    }

    async fn create_pool(&self, pool: Pool) -> Result<Pool, StoreError<Self::Error>> {
        match self.insert_pool(&pool).await? {
            PoolInsert::Inserted => Ok(pool),
            PoolInsert::IdentifierTaken(identifier) => Err(StoreError::TagTaken(identifier)),
        }
    }

    async fn save_pool(&self, pool: &Pool) -> Result<(), StoreError<Self::Error>> {
        if !self.update_pool_row(pool).await? {
            return Err(StoreError::PoolNotFound(pool.id));
        }
        Ok(())
    }

    async fn append_message(
        &self,
        pool_id: Uuid,
        message: NewMessage,
    ) -> Result<Message, StoreError<Self::Error>> {
        let index = self
            .insert_message(&pool_id, &message)
            .await?
            .ok_or(StoreError::PoolNotFound(pool_id))?;
        Ok(message.at_index(index as u64))
    }

    async fn delete_pool(&self, pool_id: Uuid) -> Result<bool, StoreError<Self::Error>> {
        Ok(self.delete_pool_row(&pool_id).await?)
    }

    async fn find_signature(&self, id: &str) -> Result<Option<Signature>, StoreError<Self::Error>> {
        Ok(self.signature_row(id).await?.map(Signature::from))
    }

    async fn count_signatures(&self) -> Result<u64, StoreError<Self::Error>> {
        Ok(self.count_signature_rows().await? as u64)
    }

    async fn create_signature(
        &self,
        signature: Signature,
    ) -> Result<Signature, StoreError<Self::Error>> {
        if !self.insert_signature(&signature).await? {
            return Err(StoreError::SignatureIdTaken(signature.id));
        }
        Ok(signature)
    }

    async fn save_signature(&self, signature: &Signature) -> Result<(), StoreError<Self::Error>> {
        if !self.update_signature_row(signature).await? {
            return Err(StoreError::SignatureNotFound(signature.id.clone()));
        }
        Ok(())
    }
}
