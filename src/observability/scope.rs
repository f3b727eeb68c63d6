//! OperationScope for per-operation completion logging
//!
//! - Logs INFO with the elapsed duration on `complete()`
//! - Logs ERROR with the cause on `fail()`
//! - Logs ERROR on drop if neither was called (panic unwinding through
//!   a handler, early return that forgot to report)

use std::cell::Cell;
use std::time::Instant;

use super::logger::Telemetry;

/// Times one operation and reports exactly one outcome record.
///
/// ```ignore
/// let scope = telemetry.scope("create_store");
/// // ... do work ...
/// scope.complete(Some("s1"), "Store created successfully");
/// ```
pub struct OperationScope<'a> {
    telemetry: &'a Telemetry,
    operation: &'static str,
    timer: Timer,
    finished: Cell<bool>,
}

impl<'a> OperationScope<'a> {
    pub fn new(telemetry: &'a Telemetry, operation: &'static str) -> Self {
        Self {
            telemetry,
            operation,
            timer: Timer::new(),
            finished: Cell::new(false),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Report success at INFO level with the elapsed duration.
    pub fn complete(self, store_id: Option<&str>, message: &str) {
        self.finished.set(true);
        self.telemetry
            .info(self.operation, store_id, message, self.timer.elapsed_ms());
    }

    /// Report failure at ERROR level.
    pub fn fail(self, store_id: Option<&str>, cause: &str) {
        self.finished.set(true);
        self.telemetry.error(self.operation, store_id, cause);
    }
}

impl Drop for OperationScope<'_> {
    fn drop(&mut self) {
        if !self.finished.get() {
            self.telemetry.error(
                self.operation,
                None,
                "operation ended without reporting an outcome",
            );
        }
    }
}

/// Wall-clock stopwatch.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds, fractional.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
