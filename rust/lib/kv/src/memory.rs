use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::KVError;
use crate::store::KVStore;

/// In-process [`KVStore`]. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.lock().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_vec());
        }
        Ok(())
    }

    fn delete_many(&self, keys: &[&str]) -> Result<(), KVError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        Ok(self
            .lock()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_behaviour() {
        crate::store::exercise(&MemoryStore::new());
    }
}
