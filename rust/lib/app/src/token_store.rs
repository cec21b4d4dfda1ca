//! Access / refresh tokens, persisted in local storage and mirrored in memory.
//!
//! The login and logout handlers are the only writers.

use std::sync::{Arc, RwLock};

use quill_client::{ApiError, TokenSource};
use quill_kv::{KVError, KVStore};

pub const ACCESS_KEY: &str = "access";
pub const REFRESH_KEY: &str = "refresh";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

pub struct TokenStore {
    kv: Arc<dyn KVStore>,
    current: RwLock<Tokens>,
}

impl TokenStore {
    /// Open over `kv`, reading whatever a previous run persisted.
    pub fn open(kv: Arc<dyn KVStore>) -> Result<Self, KVError> {
        let current = Tokens {
            access: kv.get_string(ACCESS_KEY)?,
            refresh: kv.get_string(REFRESH_KEY)?,
        };
        Ok(Self {
            kv,
            current: RwLock::new(current),
        })
    }

    /// Re-read persisted tokens into memory.
    pub fn reload(&self) -> Result<(), KVError> {
        let loaded = Tokens {
            access: self.kv.get_string(ACCESS_KEY)?,
            refresh: self.kv.get_string(REFRESH_KEY)?,
        };
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = loaded;
        Ok(())
    }

    pub fn access(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .access
            .clone()
    }

    pub fn refresh(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .refresh
            .clone()
    }

    /// The route gate only asks whether a token exists, not whether it is fresh.
    pub fn has_token(&self) -> bool {
        self.access().is_some_and(|t| !t.is_empty())
    }

    /// Persist both tokens, then publish them in memory.
    pub fn set(&self, access: &str, refresh: &str) -> Result<(), KVError> {
        self.kv.set_many(&[
            (ACCESS_KEY, access.as_bytes()),
            (REFRESH_KEY, refresh.as_bytes()),
        ])?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Tokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        };
        Ok(())
    }

    /// Replace only the access token (after a refresh call).
    pub fn set_access(&self, access: &str) -> Result<(), KVError> {
        self.kv.set_string(ACCESS_KEY, access)?;
        self.current.write().unwrap_or_else(|e| e.into_inner()).access = Some(access.to_string());
        Ok(())
    }

    /// Forget both tokens. Memory is cleared even when storage fails.
    pub fn clear(&self) -> Result<(), KVError> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Tokens::default();
        self.kv.delete_many(&[ACCESS_KEY, REFRESH_KEY])
    }
}

#[async_trait::async_trait]
impl TokenSource for TokenStore {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.access().filter(|t| !t.is_empty()))
    }
}
