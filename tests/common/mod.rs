//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use store_api::api::{ApiRequest, ApiResponse, StoreApi};
use store_api::config::Settings;
use store_api::model::{Clock, StoreRecord, Timestamp, UpdateSet};
use store_api::observability::{MemorySink, Telemetry};
use store_api::persistence::{MemoryStore, PortError, PortResult, StorePort};

pub const TABLE: &str = "stores";

/// Starts at a fixed instant and advances one second per reading.
pub struct SteppingClock {
    next_millis: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            next_millis: AtomicI64::new(1_714_564_800_000),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Timestamp {
        let millis = self.next_millis.fetch_add(1_000, Ordering::SeqCst);
        Timestamp::from_millis(millis).expect("clock stays in range")
    }
}

/// Which port call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    Get,
    Put,
    Update,
    Delete,
}

/// Wraps a port, counts writes, and injects faults on demand.
pub struct TestPort {
    inner: MemoryStore,
    fail_on: Mutex<FailOn>,
    writes: AtomicUsize,
}

impl TestPort {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on: Mutex::new(FailOn::Nothing),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail_on(&self, op: FailOn) {
        *self.fail_on.lock().unwrap() = op;
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, op: FailOn) -> PortResult<()> {
        if *self.fail_on.lock().unwrap() == op {
            return Err(PortError::Unavailable(format!("injected {:?} failure", op)));
        }
        Ok(())
    }
}

impl StorePort for TestPort {
    fn get(&self, table: &str, store_id: &str) -> PortResult<Option<StoreRecord>> {
        self.check(FailOn::Get)?;
        self.inner.get(table, store_id)
    }

    fn put_if_absent(&self, table: &str, record: &StoreRecord) -> PortResult<()> {
        self.check(FailOn::Put)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put_if_absent(table, record)
    }

    fn conditional_update(
        &self,
        table: &str,
        store_id: &str,
        changes: &UpdateSet,
    ) -> PortResult<StoreRecord> {
        self.check(FailOn::Update)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.conditional_update(table, store_id, changes)
    }

    fn delete(&self, table: &str, store_id: &str) -> PortResult<()> {
        self.check(FailOn::Delete)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(table, store_id)
    }
}

pub struct Harness {
    pub api: StoreApi<Arc<TestPort>>,
    pub port: Arc<TestPort>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new() -> Self {
        let port = Arc::new(TestPort::new());
        let sink = Arc::new(MemorySink::new());
        let api = StoreApi::new(
            Settings::with_table(TABLE),
            port.clone(),
            Telemetry::new(sink.clone()),
        )
        .with_clock(Arc::new(SteppingClock::new()));
        Self { api, port, sink }
    }

    pub fn create(&self, body: &str) -> ApiResponse {
        self.api
            .handle(&ApiRequest::new("POST", "/stores").with_body(body))
    }

    pub fn get(&self, id: &str) -> ApiResponse {
        self.api.handle(&item("GET", id))
    }

    pub fn update(&self, id: &str, body: &str) -> ApiResponse {
        self.api.handle(&item("PUT", id).with_body(body))
    }

    pub fn delete(&self, id: &str) -> ApiResponse {
        self.api.handle(&item("DELETE", id))
    }
}

pub fn item(method: &str, id: &str) -> ApiRequest {
    ApiRequest::new(method, format!("/stores/{}", id)).with_path_param("store_id", id)
}

pub fn error_code(response: &ApiResponse) -> String {
    response.error_body().expect("error envelope").code
}
