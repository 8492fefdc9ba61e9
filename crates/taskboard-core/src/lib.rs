//! Core abstractions for Taskboard: the task model, the key-value storage
//! contract, lane projection, and the events a front end raises.
//! Kept free of I/O so every piece can be tested in isolation.

pub mod events;
pub mod storage;
pub mod tasks;
pub mod view;
