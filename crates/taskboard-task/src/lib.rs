//! Task state for the board: the write-through store, its persistence
//! adapter, and the event dispatcher front ends talk to.

pub mod board;
pub mod persistence;
pub mod store;

pub use board::Board;
pub use persistence::{TaskPersistence, TASKS_KEY};
pub use store::{StoreSnapshot, SubscriptionId, TaskStore};
