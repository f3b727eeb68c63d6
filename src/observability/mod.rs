//! Telemetry for the store API
//!
//! The core only produces log records; where they go is decided by the
//! `TelemetrySink` handed in at construction.
//!
//! # Principles
//!
//! 1. One record per event, one line per record
//! 2. Logging never fails an operation
//! 3. Records never carry request bodies
//!
//! # Usage
//!
//! ```ignore
//! use store_api::observability::{Telemetry, JsonLineSink};
//!
//! let telemetry = Telemetry::new(Arc::new(JsonLineSink::stdout()));
//! let scope = telemetry.scope("get_store");
//! // ... do work ...
//! scope.complete(Some("s1"), "Store retrieved successfully");
//! ```

mod logger;
mod scope;

pub use logger::{JsonLineSink, Level, LogRecord, MemorySink, Telemetry, TelemetrySink};
pub use scope::{OperationScope, Timer};

/// `component` value stamped on every record.
pub const COMPONENT: &str = "store-management-api";
