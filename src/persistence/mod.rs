//! # Persistence Port
//!
//! The key-value capability the operation handlers depend on, keyed by
//! `store_id` inside a named table.
//!
//! # Guarantees
//!
//! - `put_if_absent` never overwrites an existing record
//! - `conditional_update` and `delete` only act on an existing record
//! - No operation retries internally

mod checksum;
mod errors;
mod file;
mod memory;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{PortError, PortResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use crate::model::{StoreRecord, UpdateSet};

/// Key-value operations against one logical table of store records.
pub trait StorePort: Send + Sync {
    /// Fetch a record by primary key.
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>>;

    /// Insert a record; fails with `AlreadyExists` if the key is taken.
    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()>;

    /// Apply `changes` to an existing record and return the full result.
    ///
    /// Fails with `NotFound` if the key is absent.
    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord>;

    /// Remove a record; fails with `NotFound` if the key is absent.
    fn delete(&self, table: &str, store_id: &str) -> PortResult<()>;
}

impl<P: StorePort + ?Sized> StorePort for Box<P> {
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>> {
        (**self).get(table, store_id)
    }

    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()> {
        (**self).put_if_absent(table, record)
    }

    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord> {
        (**self).conditional_update(table, store_id, changes)
    }

    fn delete(&self, table: &str, store_id: &str) -> PortResult<()> {
        (**self).delete(table, store_id)
    }
}

impl<P: StorePort + ?Sized> StorePort for Arc<P> {
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>> {
        (**self).get(table, store_id)
    }

    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()> {
        (**self).put_if_absent(table, record)
    }

    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord> {
        (**self).conditional_update(table, store_id, changes)
    }

    fn delete(&self, table: &str, store_id: &str) -> PortResult<()> {
        (**self).delete(table, store_id)
    }
}
