//! Structured JSON log records and the sinks that receive them.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::{Serialize, Serializer};

use super::scope::OperationScope;
use super::COMPONENT;
use crate::model::Timestamp;

/// Record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One telemetry event. Keys serialize in declaration order.
///
/// INFO records carry `duration_ms`; ERROR records never do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub timestamp: Timestamp,
    pub level: Level,
    pub component: String,
    pub operation: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
}

impl LogRecord {
    pub fn to_json_line(&self) -> String {
        // LogRecord holds only strings, a float and a timestamp
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"level\":\"{}\",\"message\":\"unserializable log record\"}}",
                self.level
            )
        });
        line.push('\n');
        line
    }
}

/// Destination for log records.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Writes each record as one JSON line.
pub struct JsonLineSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl JsonLineSink<io::Stderr> {
    /// Keeps stdout free for CLI responses.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> TelemetrySink for JsonLineSink<W> {
    fn emit(&self, record: &LogRecord) {
        let line = record.to_json_line();
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        // One write per record; failures are dropped
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn errors(&self) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == Level::Error)
            .collect()
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
    }
}

/// Record factory bound to a sink.
#[derive(Clone)]
pub struct Telemetry {
    component: String,
    sink: Arc<dyn TelemetrySink>,
}

impl Telemetry {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            component: COMPONENT.to_string(),
            sink,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Arc::new(JsonLineSink::stdout()))
    }

    /// Start timing `operation`.
    pub fn scope(&self, operation: &'static str) -> OperationScope<'_> {
        OperationScope::new(self, operation)
    }

    /// Emit an INFO record; `duration_ms` is rounded to 2 decimals.
    pub fn info(&self, operation: &str, store_id: Option<&str>, message: &str, duration_ms: f64) {
        self.emit(
            Level::Info,
            operation,
            store_id,
            message,
            Some((duration_ms * 100.0).round() / 100.0),
        );
    }

    pub fn error(&self, operation: &str, store_id: Option<&str>, message: &str) {
        self.emit(Level::Error, operation, store_id, message, None);
    }

    fn emit(
        &self,
        level: Level,
        operation: &str,
        store_id: Option<&str>,
        message: &str,
        duration_ms: Option<f64>,
    ) {
        let record = LogRecord {
            timestamp: Timestamp::now(),
            level,
            component: self.component.clone(),
            operation: operation.to_string(),
            message: message.to_string(),
            store_id: store_id.filter(|id| !id.is_empty()).map(str::to_string),
            duration_ms,
        };
        self.sink.emit(&record);
    }
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}
