/**
 * Error taxonomy shared by every node operation.
 *  Callers see every kind verbatim except
 *  internal failures, which are masked.
 */
pub mod error;
/**
 * One-way hashing of pool and signature keys.
 */
pub mod keys;
/**
 * Node operations: the façade that wires
 *  the access guard, type rules, signature
 *  binding and pagination over a store.
 */
pub mod node;
pub mod pagination;
/**
 * Pools, messages and the rules around them:
 *  - which keys each pool type may carry
 *  - who may read, write or administer a pool
 *  - which payload fields each message type needs
 */
pub mod pool;
pub mod signature;
/**
 * Storage boundary. Nodes are generic over
 *  a `NodeStore`; an in-memory one lives here.
 */
pub mod store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::error::{Denial, KeyKind, NodeError};
    pub use crate::keys::{KeyHash, KeyVerifier};
    pub use crate::node::{
        MessageDraft, MessageList, MessageView, Node, NodeInfo, NodeSettings, PoolDraft, PoolInfo,
        PoolList, PoolUpdate, SignatureDraft, SignatureInfo, SignatureUpdate,
    };
    pub use crate::pagination::{PageParams, PaginationMode};
    pub use crate::pool::{
        AccessPolicy, MessageFields, MessageKind, MetadataVisibility, PoolType, PresentedKeys,
    };
    pub use crate::signature::SignatureClaim;
    pub use crate::store::{MemoryStore, NodeStore, StoreError};
    pub use crate::version::build_info;
}
