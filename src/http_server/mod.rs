//! # Store API HTTP Server
//!
//! Serves the store API over HTTP. Every store request goes through the
//! same `StoreApi::handle` used for single invocations, so the HTTP layer
//! adds no routing rules of its own.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/stores`, `/stores/{store_id}` - Store CRUD
//! - `OPTIONS *` - CORS preflight

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
