use crate::error::KVError;

/// String-keyed byte storage.
///
/// Multi-key writes go through `set_many` / `delete_many` so a login or a
/// logout is applied as one unit: either every key changes or none does.
pub trait KVStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError>;

    fn delete_many(&self, keys: &[&str]) -> Result<(), KVError>;

    /// All entries whose key starts with `prefix`, sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, KVError> {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| KVError::Encoding {
                    key: key.to_string(),
                }),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), KVError> {
        self.set(key, value.as_bytes())
    }
}

/// Behaviour every backend must share. Each backend's tests call this.
#[cfg(test)]
pub(crate) fn exercise(store: &dyn KVStore) {
    assert!(store.get("access").unwrap().is_none());

    store.set_string("access", "a1").unwrap();
    assert_eq!(store.get_string("access").unwrap().as_deref(), Some("a1"));

    store.set_string("access", "a2").unwrap();
    assert_eq!(store.get_string("access").unwrap().as_deref(), Some("a2"));

    store
        .set_many(&[("refresh", b"r1".as_slice()), ("prefs:theme", b"dark".as_slice())])
        .unwrap();
    let prefs = store.scan("prefs:").unwrap();
    assert_eq!(prefs, vec![("prefs:theme".to_string(), b"dark".to_vec())]);

    store.delete_many(&["access", "refresh", "never-set"]).unwrap();
    assert!(store.get("access").unwrap().is_none());
    assert!(store.get("refresh").unwrap().is_none());

    store.delete("prefs:theme").unwrap();
    store.delete("prefs:theme").unwrap();
    assert!(store.scan("").unwrap().is_empty());

    store.set("bin", &[0xff, 0xfe]).unwrap();
    assert!(matches!(
        store.get_string("bin"),
        Err(KVError::Encoding { key }) if key == "bin"
    ));
}
