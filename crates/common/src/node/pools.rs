use time::OffsetDateTime;
use uuid::Uuid;

use super::drafts::{MessageDraft, PoolDraft, PoolUpdate};
use super::validate::{FieldChecks, MAX_TAG_LEN, MIN_TAG_LEN};
use super::views::{MessageList, MessageView, PoolInfo, PoolList};
use super::{store_error, Node, POOL_NOT_FOUND, TAG_IN_USE};
use crate::error::NodeError;
use crate::pagination::PageParams;
use crate::pool::{
    check_compatibility, violations, KeyLayout, MessageKind, NewMessage, Operation, Pool,
    PoolType, PresentedKeys,
};
use crate::store::NodeStore;

impl<S: NodeStore> Node<S> {
    /// Create a pool of `pool_type`.
    ///
    /// Field lengths and the type's key layout are checked together and
    ///  reported as one `InvalidInput`; a taken tag is a `Conflict`.
    pub async fn create_pool(
        &self,
        pool_type: PoolType,
        draft: PoolDraft,
    ) -> Result<PoolInfo, NodeError> {
        let mut checks = FieldChecks::new();
        checks
            .key("master_key", &draft.master_key)
            .optional_key("writer_key", draft.writer_key.as_deref())
            .optional_key("reader_key", draft.reader_key.as_deref())
            .optional_length("tag", draft.tag.as_deref(), MIN_TAG_LEN, MAX_TAG_LEN)
            .description(draft.description.as_deref())
            .extend(violations(
                pool_type,
                KeyLayout {
                    has_writer_key: draft.writer_key.is_some(),
                    has_reader_key: draft.reader_key.is_some(),
                    encrypted: draft.encrypted,
                },
            ));
        let errors = checks.into_errors();
        if !errors.is_empty() {
            return Err(NodeError::violations("Invalid pool parameters", &errors));
        }

        if let Some(tag) = &draft.tag {
            if self
                .store
                .find_pool(tag)
                .await
                .map_err(store_error)?
                .is_some()
            {
                return Err(NodeError::Conflict(TAG_IN_USE.into()));
            }
        }

        let creator_signature = self
            .bind_signature(draft.creator_signature.as_ref())
            .await?;

        let master_key_hash = self.verifier.hash(&draft.master_key)?;
        let writer_key_hash = match &draft.writer_key {
            Some(key) => Some(self.verifier.hash(key)?),
            None => None,
        };
        let reader_key_hash = match &draft.reader_key {
            Some(key) => Some(self.verifier.hash(key)?),
            None => None,
        };

        let pool = Pool {
            id: Uuid::new_v4(),
            tag: draft.tag,
            pool_type,
            description: draft.description,
            public: draft.public,
            encrypted: draft.encrypted,
            master_key_hash,
            writer_key_hash,
            reader_key_hash,
            creator_signature,
            created_at: (!draft.hide_creation_date).then(OffsetDateTime::now_utc),
            messages: Vec::new(),
        };
        let pool = self.store.create_pool(pool).await.map_err(store_error)?;

        tracing::info!(pool = %pool.id, pool_type = %pool.pool_type, "created pool");
        Ok(PoolInfo::from(&pool))
    }

    pub async fn pool_info(
        &self,
        identifier: &str,
        keys: &PresentedKeys,
    ) -> Result<PoolInfo, NodeError> {
        let pool = self.load_pool(identifier).await?;
        self.guard.authorize(Operation::ReadMetadata, &pool, keys)?;
        Ok(PoolInfo::from(&pool))
    }

    /// Pools whose metadata anyone may read, paginated
    pub async fn list_pools(&self, params: &PageParams) -> Result<PoolList, NodeError> {
        let window = self.pagination.window(params)?;
        let pools: Vec<Pool> = self
            .store
            .list_pools()
            .await
            .map_err(store_error)?
            .into_iter()
            .filter(|pool| self.guard.metadata_is_open(pool))
            .collect();

        let page: Vec<PoolInfo> = window.apply(&pools).iter().map(PoolInfo::from).collect();
        Ok(PoolList {
            total: pools.len() as u64,
            count: page.len() as u64,
            pools: page,
        })
    }

    pub async fn read_messages(
        &self,
        identifier: &str,
        params: &PageParams,
        keys: &PresentedKeys,
    ) -> Result<MessageList, NodeError> {
        let window = self.pagination.window(params)?;
        let pool = self.load_pool(identifier).await?;
        self.guard.authorize(Operation::ReadMessages, &pool, keys)?;

        let page: Vec<MessageView> = window
            .apply(&pool.messages)
            .iter()
            .map(MessageView::from)
            .collect();
        Ok(MessageList {
            total: pool.messages.len() as u64,
            count: page.len() as u64,
            messages: page,
        })
    }

    /// Append a message of `kind`.
    ///
    /// Field shape is checked first (`InvalidInput`), then write access, then
    ///  whether the kind fits the pool (`Conflict`), then the signature.
    pub async fn write_message(
        &self,
        identifier: &str,
        kind: MessageKind,
        draft: MessageDraft,
    ) -> Result<MessageView, NodeError> {
        let payload = draft
            .fields
            .into_payload(kind)
            .map_err(|errors| NodeError::violations("Invalid message parameters", &errors))?;

        let pool = self.load_pool(identifier).await?;
        let keys = PresentedKeys {
            writer: draft.writer_key,
            ..Default::default()
        };
        self.guard.authorize(Operation::Write, &pool, &keys)?;
        check_compatibility(pool.encrypted, kind).map_err(NodeError::Conflict)?;

        let signature = self.bind_signature(draft.signature.as_ref()).await?;

        let message = self
            .store
            .append_message(
                pool.id,
                NewMessage {
                    created_at: (!draft.hide_date).then(OffsetDateTime::now_utc),
                    payload,
                    signature,
                },
            )
            .await
            .map_err(store_error)?;

        tracing::info!(pool = %pool.id, index = message.index, kind = %kind, "appended message");
        Ok(MessageView::from(&message))
    }

    /// Change a pool's description or rotate its keys. Needs the master key.
    pub async fn update_pool(
        &self,
        identifier: &str,
        update: PoolUpdate,
    ) -> Result<PoolInfo, NodeError> {
        let mut checks = FieldChecks::new();
        checks
            .description(update.description.as_deref())
            .optional_key("new_master_key", update.new_master_key.as_deref())
            .optional_key("new_writer_key", update.new_writer_key.as_deref())
            .optional_key("new_reader_key", update.new_reader_key.as_deref());
        let errors = checks.into_errors();
        if !errors.is_empty() {
            return Err(NodeError::violations("Invalid pool parameters", &errors));
        }

        let mut pool = self.load_pool(identifier).await?;
        self.guard.authorize(
            Operation::Administer,
            &pool,
            &PresentedKeys::master(update.master_key.as_str()),
        )?;

        // a key can be rotated only where the pool type carries one
        let mut checks = FieldChecks::new();
        if update.new_writer_key.is_some() && pool.writer_key_hash.is_none() {
            checks.push(format!(
                "`new_writer_key` cannot be set, `{}` pools have no writer key",
                pool.pool_type
            ));
        }
        if update.new_reader_key.is_some() && pool.reader_key_hash.is_none() {
            checks.push(format!(
                "`new_reader_key` cannot be set, `{}` pools have no reader key",
                pool.pool_type
            ));
        }
        let errors = checks.into_errors();
        if !errors.is_empty() {
            return Err(NodeError::violations("Invalid pool parameters", &errors));
        }

        if update.is_empty() {
            return Ok(PoolInfo::from(&pool));
        }

        if let Some(description) = update.description {
            pool.description = Some(description);
        }
        if let Some(key) = &update.new_master_key {
            pool.master_key_hash = self.verifier.hash(key)?;
        }
        if let Some(key) = &update.new_writer_key {
            pool.writer_key_hash = Some(self.verifier.hash(key)?);
        }
        if let Some(key) = &update.new_reader_key {
            pool.reader_key_hash = Some(self.verifier.hash(key)?);
        }

        self.store.save_pool(&pool).await.map_err(store_error)?;
        tracing::info!(pool = %pool.id, "updated pool");
        Ok(PoolInfo::from(&pool))
    }

    /// Delete a pool and its messages. Returns what the pool looked like.
    pub async fn delete_pool(
        &self,
        identifier: &str,
        master_key: Option<&str>,
    ) -> Result<PoolInfo, NodeError> {
        let pool = self.load_pool(identifier).await?;
        let keys = PresentedKeys {
            master: master_key.map(str::to_string),
            ..Default::default()
        };
        self.guard.authorize(Operation::Administer, &pool, &keys)?;

        if !self.store.delete_pool(pool.id).await.map_err(store_error)? {
            return Err(NodeError::NotFound(POOL_NOT_FOUND.into()));
        }

        tracing::info!(pool = %pool.id, "deleted pool");
        Ok(PoolInfo::from(&pool))
    }
}
