use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};

use crate::error::KVError;
use crate::store::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("local_storage");

/// On-disk [`KVStore`] backed by redb.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the database file and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(KVError::storage)?;
        }
        let db = Database::create(path).map_err(KVError::storage)?;
        let store = Self { db };
        store.write(|_| Ok(()))?;
        tracing::debug!(path = %path.display(), "opened local storage");
        Ok(store)
    }

    /// Run `f` against the table inside one committed write transaction.
    fn write<F>(&self, f: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut redb::Table<'_, &'static str, &'static [u8]>) -> Result<(), KVError>,
    {
        let txn: WriteTransaction = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(KVError::storage)?;
            f(&mut table)?;
        }
        txn.commit().map_err(KVError::storage)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.set_many(&[(key, value)])
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.delete_many(&[key])
    }

    fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }

    fn delete_many(&self, keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for key in keys {
                table.remove(*key).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut out = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_string(), value.value().to_vec()));
        }
        Ok(out)
    }
}
