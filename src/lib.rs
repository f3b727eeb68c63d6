//! store-api - CRUD over store records behind a stateless request handler
//!
//! One `ApiRequest` in, one `ApiResponse` out; persistence is an injected
//! `StorePort`.

pub mod api;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod persistence;

pub use api::{ApiRequest, ApiResponse, StoreApi};
pub use config::Settings;
pub use model::StoreRecord;
pub use persistence::{FileStore, MemoryStore, StorePort};
