//! In-process tables, for tests and the `--in-memory` CLI mode.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::errors::{PortError, PortResult};
use super::StorePort;
use crate::model::{StoreRecord, UpdateSet};

type Table = BTreeMap<String, StoreRecord>;

/// Tables held in memory: table name -> store_id -> record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `table`.
    pub fn len(&self, table: &str) -> PortResult<usize> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.get(table).map(BTreeMap::len).unwrap_or(0))
    }

    pub fn is_empty(&self, table: &str) -> PortResult<bool> {
        self.len(table).map(|n| n == 0)
    }
}

fn poisoned() -> PortError {
    PortError::Unavailable("Lock poisoned".to_string())
}

impl StorePort for MemoryStore {
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.get(table).and_then(|t| t.get(store_id)).cloned())
    }

    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let rows = tables.entry(table.to_string()).or_default();
        if rows.contains_key(&record.store_id) {
            return Err(PortError::AlreadyExists(record.store_id.clone()));
        }
        rows.insert(record.store_id.clone(), record.clone());
        Ok(())
    }

    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let record = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(store_id))
            .ok_or_else(|| PortError::NotFound(store_id.to_string()))?;
        changes.apply_to(record);
        Ok(record.clone())
    }

    fn delete(&self, table: &str, store_id: &str) -> PortResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables
            .get_mut(table)
            .and_then(|t| t.remove(store_id))
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(store_id.to_string()))
    }
}
