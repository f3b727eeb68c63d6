//! The store record and the partial-update set applied to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp::Timestamp;

/// A persisted store, keyed by `store_id`.
///
/// `s3_sync_config` is `None` when it was never supplied; a supplied `null`
/// is kept as `Some(Value::Null)` and written back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
    #[serde(
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub s3_sync_config: Option<Value>,
}

fn empty_metadata() -> Value {
    Value::Object(Map::new())
}

impl StoreRecord {
    /// Build a fresh record; both timestamps are `at`.
    pub fn new(store_id: impl Into<String>, name: impl Into<String>, at: Timestamp) -> Self {
        Self {
            store_id: store_id.into(),
            name: name.into(),
            description: String::new(),
            created_at: at,
            updated_at: at,
            metadata: empty_metadata(),
            s3_sync_config: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_s3_sync_config(mut self, config: Value) -> Self {
        self.s3_sync_config = Some(config);
        self
    }
}

/// Fields to overwrite on an existing record.
///
/// Only `Some` fields are written; `updated_at` is always written.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSet {
    pub updated_at: Timestamp,
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub s3_sync_config: Option<Value>,
}

impl UpdateSet {
    pub fn touch(updated_at: Timestamp) -> Self {
        Self {
            updated_at,
            name: None,
            description: None,
            metadata: None,
            s3_sync_config: None,
        }
    }

    /// Apply in place. `store_id` and `created_at` are never touched.
    pub fn apply_to(&self, record: &mut StoreRecord) {
        record.updated_at = self.updated_at;
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(metadata) = &self.metadata {
            record.metadata = metadata.clone();
        }
        if let Some(config) = &self.s3_sync_config {
            record.s3_sync_config = Some(config.clone());
        }
    }
}
