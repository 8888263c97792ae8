//! Shared test utilities for node integration tests
#![allow(dead_code)]

use common::keys::KeyVerifier;
use common::node::{Node, NodeSettings, PoolDraft};
use common::store::MemoryStore;

/// Argon2 costs low enough to keep tests fast
pub fn cheap_verifier() -> KeyVerifier {
    KeyVerifier::with_cost(8, 1, 1).unwrap()
}

/// Set up a node over a fresh in-memory store with default settings
pub fn setup_node() -> Node<MemoryStore> {
    setup_node_with(NodeSettings::default())
}

pub fn setup_node_with(settings: NodeSettings) -> Node<MemoryStore> {
    Node::with_verifier(settings, MemoryStore::new(), cheap_verifier())
}

/// Pool draft with only a master key set
pub fn draft(master_key: &str) -> PoolDraft {
    PoolDraft {
        master_key: master_key.to_string(),
        ..Default::default()
    }
}
