//! Durable local storage for the client: a small string-keyed byte store.
//!
//! The app keeps its `access` / `refresh` tokens here. [`RedbStore`] is the
//! on-disk backend; [`MemoryStore`] backs tests and ephemeral sessions.

pub mod error;
pub mod memory;
pub mod redb;
pub mod store;

pub use error::KVError;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use store::KVStore;
