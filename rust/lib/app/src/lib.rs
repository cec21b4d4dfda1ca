//! Quill client app: the data-sync layer behind the blog UI.
//!
//! Structure:
//! - `state/`: page state, one `#[state]` type per path
//! - `request/`: `#[request]` types the UI emits
//! - `handlers/`: request handlers and their Flux wiring
//! - `token_store`, `session`, `routing`: auth tokens, identity, route gate
//!
//! A renderer emits requests on [`QuillApp::flux`] and reads state back
//! from the same store.

pub mod config;
pub mod context;
pub mod debounce;
pub mod handlers;
pub mod keys;
pub mod notify;
pub mod request;
pub mod routing;
pub mod session;
pub mod state;
pub mod strings;
pub mod token_store;

#[cfg(test)]
mod golden_test;

use std::sync::Arc;

use quill_flux::Flux;
use quill_kv::{KVError, KVStore, RedbStore};

pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use routing::{Resolution, Route};
pub use session::{Session, SessionError};
pub use token_store::TokenStore;

/// A wired app: Flux store and router with every handler registered.
pub struct QuillApp {
    pub flux: Flux,
    pub ctx: Arc<AppContext>,
}

impl QuillApp {
    pub fn new(config: ClientConfig, kv: Arc<dyn KVStore>) -> Result<Self, KVError> {
        let ctx = Arc::new(AppContext::new(config, kv)?);
        let flux = Flux::new();
        handlers::register_handlers(&flux, Arc::clone(&ctx));
        Ok(Self { flux, ctx })
    }

    /// Open with redb storage at the configured location.
    pub fn open(config: ClientConfig) -> Result<Self, KVError> {
        let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&config.storage_path())?);
        Self::new(config, kv)
    }
}
