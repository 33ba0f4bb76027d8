//! Key-value store implementations.
//!
//! Provides three [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! backends:
//! - [`JsonFileStore`] - One JSON file per key under a data directory
//! - [`MemoryStore`] - In-process map for tests and ephemeral runs
//! - [`RedisStore`] - Redis strings, shared between processes

mod file_store;
mod memory_store;
mod redis_store;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
