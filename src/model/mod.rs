//! # Store Data Model
//!
//! The single managed entity (`StoreRecord`), the request bodies that
//! create and patch it, and the timestamp/clock types that stamp it.

mod record;
mod request;
mod timestamp;

pub use record::{StoreRecord, UpdateSet};
pub use request::{CreateStoreRequest, UpdateStoreRequest};
pub use timestamp::{Clock, SystemClock, Timestamp};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field that must distinguish "absent" from "present as null".
///
/// Combined with `#[serde(default)]`, an absent key yields `None` and a key
/// holding `null` yields `Some(Value::Null)`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
