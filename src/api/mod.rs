//! # Store API
//!
//! Stateless request handling for store records: one `ApiRequest` in, one
//! `ApiResponse` out.
//!
//! # Design Principles
//!
//! - The persistence port is injected, never global
//! - Handlers return explicit results; `handle` turns them into envelopes
//! - Create never overwrites; update and delete target existing records
//! - Nothing is retried
//!
//! # Supported Operations
//!
//! - `POST /stores` create
//! - `GET /stores/{store_id}` get
//! - `PUT /stores/{store_id}` partial update
//! - `DELETE /stores/{store_id}` delete

mod errors;
mod handler;
mod request;
mod response;
mod router;
mod validator;

pub use errors::{ApiError, ApiResult, ErrorCode};
pub use handler::{StoreApi, HANDLER_OPERATION};
pub use request::ApiRequest;
pub use response::{default_headers, ApiResponse, ErrorBody, ErrorEnvelope};
pub use router::{Route, COLLECTION_PATH, STORE_ID_PARAM};
pub use validator::{is_valid_store_id, validate_create, ValidatedCreate};
