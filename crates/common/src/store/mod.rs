mod memory;
mod provider;

pub use memory::{MemoryStore, MemoryStoreError};
pub use provider::{NodeStore, StoreError};
