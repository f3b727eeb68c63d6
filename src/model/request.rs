//! Request bodies accepted by the create and update operations.
//!
//! Unknown keys are ignored. `metadata` and `s3_sync_config` are taken as
//! arbitrary JSON without further checks.

use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /stores`. Presence and format are checked by the validator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateStoreRequest {
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "super::present")]
    pub s3_sync_config: Option<Value>,
}

/// Body of `PUT /stores/{store_id}`; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateStoreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "super::present")]
    pub s3_sync_config: Option<Value>,
}
