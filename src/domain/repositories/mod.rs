//! Persistence trait definitions for the domain layer.
//!
//! The copier only ever persists small JSON documents by key, so a single
//! [`KeyValueStore`] trait covers every stored entity. Implementations live
//! in `crate::infrastructure::storage`; a `mockall` mock is generated for
//! unit tests.

pub mod key_value_store;

pub use key_value_store::{
    KeyValueStore, StoreArea, StoreError, StoreResult, keys, load, save,
};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
