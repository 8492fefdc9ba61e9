//! Key-value persistence contract the task store writes through to.

mod kv_store;

pub use kv_store::{InMemoryStore, KvStore, KvStoreError};
