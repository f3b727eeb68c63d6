//! Operation handlers and the request entry point
//!
//! Flow for one invocation:
//! 1. Resolve the route
//! 2. Decode the body (create/update)
//! 3. Validate (create)
//! 4. Call the persistence port
//! 5. Build the response envelope and log the outcome
//!
//! Every persistence error is classified here; nothing escapes `handle`
//! except an `ApiResponse`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::Settings;
use crate::model::{
    Clock, CreateStoreRequest, StoreRecord, SystemClock, UpdateSet, UpdateStoreRequest,
};
use crate::observability::{OperationScope, Telemetry};
use crate::persistence::{PortError, StorePort};

use super::errors::{ApiError, ApiResult};
use super::request::ApiRequest;
use super::response::ApiResponse;
use super::router::Route;
use super::validator::validate_create;

/// Operation name for failures outside any single operation.
pub const HANDLER_OPERATION: &str = "handle_request";
const ROUTE_OPERATION: &str = "route_request";

/// The store API over an injected persistence port.
pub struct StoreApi<P: StorePort> {
    settings: Settings,
    port: P,
    telemetry: Telemetry,
    clock: Arc<dyn Clock>,
}

impl<P: StorePort> StoreApi<P> {
    pub fn new(settings: Settings, port: P, telemetry: Telemetry) -> Self {
        Self {
            settings,
            port,
            telemetry,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Handle one request. Always returns an envelope, panics included.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request))) {
            Ok(response) => response,
            Err(payload) => {
                self.telemetry.error(
                    HANDLER_OPERATION,
                    None,
                    &format!("Unhandled panic: {}", panic_message(payload.as_ref())),
                );
                ApiResponse::error(&ApiError::unexpected())
            }
        }
    }

    /// Answer a request turned away before it could be decoded.
    pub fn reject(&self, err: &ApiError) -> ApiResponse {
        self.telemetry
            .error(HANDLER_OPERATION, None, &err.log_message());
        ApiResponse::error(err)
    }

    fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let route = match Route::resolve(request) {
            Ok(route) => route,
            Err(err) => {
                self.telemetry.error(ROUTE_OPERATION, None, &err.log_message());
                return ApiResponse::error(&err);
            }
        };

        let scope = self.telemetry.scope(route.operation());
        match &route {
            Route::Create => {
                let mut store_id = None;
                let result = request
                    .json_body::<CreateStoreRequest>()
                    .and_then(|body| {
                        store_id = body.store_id.clone();
                        self.create(&body)
                    })
                    .map(|record| (StatusCode::CREATED, Some(record)));
                self.finish(scope, store_id.as_deref(), result, "Store created successfully")
            }
            Route::Get(id) => {
                let result = self.get(id).map(|record| (StatusCode::OK, Some(record)));
                self.finish(scope, Some(id.as_str()), result, "Store retrieved successfully")
            }
            Route::Update(id) => {
                let result = request
                    .json_body::<UpdateStoreRequest>()
                    .and_then(|body| self.update(id, &body))
                    .map(|record| (StatusCode::OK, Some(record)));
                self.finish(scope, Some(id.as_str()), result, "Store updated successfully")
            }
            Route::Delete(id) => {
                let result = self.delete(id).map(|()| (StatusCode::NO_CONTENT, None));
                self.finish(scope, Some(id.as_str()), result, "Store deleted successfully")
            }
        }
    }

    fn finish(
        &self,
        scope: OperationScope<'_>,
        store_id: Option<&str>,
        result: ApiResult<(StatusCode, Option<StoreRecord>)>,
        message: &str,
    ) -> ApiResponse {
        match result {
            Ok((status, record)) => {
                scope.complete(store_id, message);
                ApiResponse::success(status, record.as_ref())
            }
            Err(err) => {
                scope.fail(store_id, &err.log_message());
                ApiResponse::error(&err)
            }
        }
    }

    /// Create a store. Never overwrites an existing record.
    pub fn create(&self, body: &CreateStoreRequest) -> ApiResult<StoreRecord> {
        let valid = validate_create(body)?;
        let table = self.table()?;

        let mut record = StoreRecord::new(valid.store_id, valid.name, self.clock.now());
        if let Some(description) = &body.description {
            record.description = description.clone();
        }
        if let Some(metadata) = &body.metadata {
            record.metadata = metadata.clone();
        }
        record.s3_sync_config = body.s3_sync_config.clone();

        match self.port.get(table, &record.store_id) {
            Ok(Some(_)) => return Err(ApiError::already_exists(&record.store_id)),
            Ok(None) => {}
            Err(e) => return Err(check_failed(e)),
        }

        // The insert is conditional; a concurrent create that won the race
        // surfaces here as AlreadyExists.
        match self.port.put_if_absent(table, &record) {
            Ok(()) => Ok(record),
            Err(PortError::AlreadyExists(_)) => Err(ApiError::already_exists(&record.store_id)),
            Err(e) => Err(ApiError::internal("Failed to create store").with_cause(e)),
        }
    }

    pub fn get(&self, store_id: &str) -> ApiResult<StoreRecord> {
        let table = self.table()?;
        match self.port.get(table, store_id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ApiError::not_found(store_id)),
            Err(e) => Err(ApiError::internal("Failed to retrieve store").with_cause(e)),
        }
    }

    /// Overwrite only the supplied fields; `updated_at` always moves forward.
    pub fn update(&self, store_id: &str, body: &UpdateStoreRequest) -> ApiResult<StoreRecord> {
        let table = self.table()?;
        let existing = self.require_existing(table, store_id)?;

        let changes = UpdateSet {
            updated_at: self.clock.now().strictly_after(existing.updated_at),
            name: body.name.clone(),
            description: body.description.clone(),
            metadata: body.metadata.clone(),
            s3_sync_config: body.s3_sync_config.clone(),
        };

        match self.port.conditional_update(table, store_id, &changes) {
            Ok(record) => Ok(record),
            Err(PortError::NotFound(_)) => Err(ApiError::not_found(store_id)),
            Err(e) => Err(ApiError::internal("Failed to update store").with_cause(e)),
        }
    }

    pub fn delete(&self, store_id: &str) -> ApiResult<()> {
        let table = self.table()?;
        self.require_existing(table, store_id)?;

        match self.port.delete(table, store_id) {
            Ok(()) => Ok(()),
            Err(PortError::NotFound(_)) => Err(ApiError::not_found(store_id)),
            Err(e) => Err(ApiError::internal("Failed to delete store").with_cause(e)),
        }
    }

    fn require_existing(&self, table: &str, store_id: &str) -> ApiResult<StoreRecord> {
        match self.port.get(table, store_id) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ApiError::not_found(store_id)),
            Err(e) => Err(check_failed(e)),
        }
    }

    fn table(&self) -> ApiResult<&str> {
        self.settings
            .require_table()
            .map_err(|e| ApiError::internal("Store table is not configured").with_cause(e))
    }
}

fn check_failed(err: PortError) -> ApiError {
    ApiError::internal("Failed to check existing store").with_cause(err)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
