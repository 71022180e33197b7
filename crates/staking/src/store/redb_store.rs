use std::path::Path;

use redb::{ReadableTable, TableDefinition};

use super::{prefix_end, StateStore, StoreError};

const STATE_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("state");

/// Durable state store backed by a single redb table.
pub struct RedbStore {
    db: redb::Database,
}

impl RedbStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = redb::Database::create(path).map_err(StoreError::Database)?;

        // Implicitly creates the table if it does not exist yet
        let tx = db.begin_write()?;
        let _ = tx.open_table(STATE_TABLE)?;
        tx.commit()?;

        Ok(Self { db })
    }
}

impl StateStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(STATE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let tx = self.db.begin_write()?;
        {
            let mut table = tx.open_table(STATE_TABLE)?;
            table.insert(key, value)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        let tx = self.db.begin_write()?;
        {
            let mut table = tx.open_table(STATE_TABLE)?;
            table.remove(key)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(STATE_TABLE)?;

        let mut entries = Vec::new();
        let range = match prefix_end(prefix) {
            Some(end) => table.range(prefix..end.as_slice())?,
            None => table.range(prefix..)?,
        };
        for item in range {
            let (key, value) = item?;
            entries.push((key.value().to_vec(), value.value().to_vec()));
        }
        Ok(entries)
    }
}
