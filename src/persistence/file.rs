//! File-backed tables under a data directory.
//!
//! Each table lives in `<data_dir>/<table>.tbl`:
//!
//! ```text
//! STORETBL1 <crc32 as 8 hex digits>\n
//! <JSON object: store_id -> record>
//! ```
//!
//! Every read verifies the checksum; a mismatch is reported as
//! `PortError::Corrupted` and never repaired silently. Writes replace the
//! whole file through a synced temp file and a rename.
//!
//! Read-modify-write cycles are serialized within one process only.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{PortError, PortResult};
use super::StorePort;
use crate::model::{StoreRecord, UpdateSet};

const MAGIC: &str = "STORETBL1";
const EXTENSION: &str = "tbl";

type Table = BTreeMap<String, StoreRecord>;

/// Durable tables, one checksummed JSON file per table.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) the data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> PortResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| {
            PortError::io(
                format!("Failed to create data directory: {}", data_dir.display()),
                e,
            )
        })?;
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `table`.
    pub fn table_path(&self, table: &str) -> PortResult<PathBuf> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PortError::InvalidTable(table.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.{}", table, EXTENSION)))
    }

    fn load(&self, table: &str) -> PortResult<Table> {
        let path = self.table_path(table)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Table::new()),
            Err(e) => {
                return Err(PortError::io(
                    format!("Failed to read table: {}", path.display()),
                    e,
                ))
            }
        };
        decode_table(&bytes)
    }

    fn save(&self, table: &str, rows: &Table) -> PortResult<()> {
        let path = self.table_path(table)?;
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        let bytes = encode_table(rows)?;

        let mut file = File::create(&tmp)
            .map_err(|e| PortError::io(format!("Failed to create {}", tmp.display()), e))?;
        file.write_all(&bytes)
            .and_then(|_| file.sync_all())
            .map_err(|e| PortError::io(format!("Failed to write {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .map_err(|e| PortError::io(format!("Failed to replace {}", path.display()), e))
    }

    fn modify<T>(
        &self,
        table: &str,
        change: impl FnOnce(&mut Table) -> PortResult<T>,
    ) -> PortResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PortError::Unavailable("Lock poisoned".to_string()))?;
        let mut rows = self.load(table)?;
        let out = change(&mut rows)?;
        self.save(table, &rows)?;
        Ok(out)
    }
}

fn encode_table(rows: &Table) -> PortResult<Vec<u8>> {
    let payload = serde_json::to_vec(rows)?;
    let mut bytes = format!("{} {:08x}\n", MAGIC, compute_checksum(&payload)).into_bytes();
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

fn decode_table(bytes: &[u8]) -> PortResult<Table> {
    let split = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| PortError::Corrupted("missing header".to_string()))?;
    let header = std::str::from_utf8(&bytes[..split])
        .map_err(|_| PortError::Corrupted("header is not UTF-8".to_string()))?;
    let payload = &bytes[split + 1..];

    let expected = header
        .strip_prefix(MAGIC)
        .map(str::trim)
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .ok_or_else(|| PortError::Corrupted(format!("bad header: {:?}", header)))?;
    if !verify_checksum(payload, expected) {
        return Err(PortError::Corrupted(format!(
            "checksum mismatch (expected {:08x}, got {:08x})",
            expected,
            compute_checksum(payload)
        )));
    }
    Ok(serde_json::from_slice(payload)?)
}

impl StorePort for FileStore {
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>> {
        Ok(self.load(table)?.remove(store_id))
    }

    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()> {
        self.modify(table, |rows| {
            if rows.contains_key(&record.store_id) {
                return Err(PortError::AlreadyExists(record.store_id.clone()));
            }
            rows.insert(record.store_id.clone(), record.clone());
            Ok(())
        })
    }

    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord> {
        self.modify(table, |rows| {
            let record = rows
                .get_mut(store_id)
                .ok_or_else(|| PortError::NotFound(store_id.to_string()))?;
            changes.apply_to(record);
            Ok(record.clone())
        })
    }

    fn delete(&self, table: &str, store_id: &str) -> PortResult<()> {
        self.modify(table, |rows| {
            rows.remove(store_id)
                .map(|_| ())
                .ok_or_else(|| PortError::NotFound(store_id.to_string()))
        })
    }
}
