//! Concrete storage implementations for the `KvStore` contract.
//! One file per key, replaced atomically on every write.

pub mod file_store;
