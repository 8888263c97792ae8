mod drafts;
mod pools;
mod signatures;
mod validate;
mod views;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::keys::KeyVerifier;
use crate::pagination::{PaginationMode, PaginationPolicy};
use crate::pool::{AccessGuard, AccessPolicy, Pool};
use crate::signature::{Signature, SignatureBinder, SignatureClaim};
use crate::store::{NodeStore, StoreError};

pub use drafts::{MessageDraft, PoolDraft, PoolUpdate, SignatureDraft, SignatureUpdate};
pub use validate::{
    MAX_DESCRIPTION_LEN, MAX_SIGNATURE_VALUE_LEN, MAX_TAG_LEN, MIN_DESCRIPTION_LEN,
    MIN_SIGNATURE_VALUE_LEN, MIN_TAG_LEN,
};
pub use views::{MessageList, MessageView, NodeInfo, PoolInfo, PoolList, SignatureInfo};

const POOL_NOT_FOUND: &str = "Pool does not exist.";
const SIGNATURE_NOT_FOUND: &str = "Signature does not exist.";
const TAG_IN_USE: &str = "Tag is already in use.";

/// Deployment choices a node runs with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSettings {
    pub name: String,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default)]
    pub pagination: PaginationMode,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            name: "evade-node".to_string(),
            access: AccessPolicy::default(),
            pagination: PaginationMode::default(),
        }
    }
}

/// Every operation a node offers, over some [`NodeStore`].
///
/// Each call fetches what it needs, runs the access and shape rules against
///  that snapshot, and hands any mutation back to the store. Nothing is held
///  between calls.
#[derive(Debug, Clone)]
pub struct Node<S: NodeStore> {
    settings: NodeSettings,
    store: S,
    verifier: KeyVerifier,
    guard: AccessGuard,
    binder: SignatureBinder,
    pagination: PaginationPolicy,
}

impl<S: NodeStore> Node<S> {
    pub fn new(settings: NodeSettings, store: S) -> Self {
        Self::with_verifier(settings, store, KeyVerifier::new())
    }

    /// Same as [`Node::new`] with a specific key verifier (e.g. cheaper
    ///  hashing parameters)
    pub fn with_verifier(settings: NodeSettings, store: S, verifier: KeyVerifier) -> Self {
        let guard = AccessGuard::new(verifier.clone(), settings.access);
        let binder = SignatureBinder::new(verifier.clone());
        let pagination = PaginationPolicy::new(settings.pagination);
        Self {
            settings,
            store,
            verifier,
            guard,
            binder,
            pagination,
        }
    }

    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn node_info(&self) -> Result<NodeInfo, NodeError> {
        let pools_count = self.store.count_pools().await.map_err(store_error)?;
        let signatures_count = self.store.count_signatures().await.map_err(store_error)?;
        Ok(NodeInfo {
            name: self.settings.name.clone(),
            version: crate::version::node_version().to_string(),
            pools_count,
            signatures_count,
        })
    }

    async fn load_pool(&self, identifier: &str) -> Result<Pool, NodeError> {
        self.store
            .find_pool(identifier)
            .await
            .map_err(store_error)?
            .ok_or_else(|| NodeError::NotFound(POOL_NOT_FOUND.into()))
    }

    /// Resolve an optional signature claim. No claim, no binding.
    async fn bind_signature(
        &self,
        claim: Option<&SignatureClaim>,
    ) -> Result<Option<Signature>, NodeError> {
        let Some(claim) = claim else {
            return Ok(None);
        };
        let found = self
            .store
            .find_signature(&claim.id)
            .await
            .map_err(store_error)?;
        self.binder.bind(claim, found).map(Some)
    }
}

/// Fold a store failure into the node error taxonomy
fn store_error<T: Display>(err: StoreError<T>) -> NodeError {
    match err {
        StoreError::TagTaken(_) => NodeError::Conflict(TAG_IN_USE.into()),
        StoreError::PoolNotFound(_) => NodeError::NotFound(POOL_NOT_FOUND.into()),
        StoreError::SignatureNotFound(_) => NodeError::NotFound(SIGNATURE_NOT_FOUND.into()),
        other => NodeError::internal(other),
    }
}
