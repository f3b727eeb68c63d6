//! # HTTP Server
//!
//! axum front end for `StoreApi`. `/stores/:store_id` is matched by axum so
//! the id arrives percent-decoded; every other path falls through to the
//! same handler, whose router rejects what it does not know. Store requests
//! run on the blocking pool and the resulting envelope is written back
//! verbatim. Bodies must be UTF-8.

use std::any::Any;
use std::io;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use super::config::HttpServerConfig;
use crate::api::{ApiError, ApiRequest, ApiResponse, StoreApi, STORE_ID_PARAM};
use crate::persistence::StorePort;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// HTTP server for the store API
pub struct HttpServer<P: StorePort + 'static> {
    config: HttpServerConfig,
    api: Arc<StoreApi<P>>,
}

impl<P: StorePort + 'static> HttpServer<P> {
    pub fn new(config: HttpServerConfig, api: StoreApi<P>) -> Self {
        Self {
            config,
            api: Arc::new(api),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Build the router (also used directly by tests)
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/stores/:store_id", any(dispatch_item::<P>))
            .fallback(dispatch::<P>)
            .with_state(self.api.clone())
            .layer(ServiceBuilder::new().layer(CatchPanicLayer::custom(panic_response)))
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()?).await?;
        println!("Store API listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router()).await
    }
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

/// `/stores/{store_id}`. The segment arrives percent-decoded.
async fn dispatch_item<P: StorePort + 'static>(
    State(api): State<Arc<StoreApi<P>>>,
    method: Method,
    uri: Uri,
    store_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    // An undecodable segment leaves the request without a store_id, which
    // the router rejects
    let store_id = store_id.ok().map(|Path(id)| id);
    forward(api, method, uri, store_id, body).await
}

/// Everything else, including `/stores`.
async fn dispatch<P: StorePort + 'static>(
    State(api): State<Arc<StoreApi<P>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    forward(api, method, uri, None, body).await
}

async fn forward<P: StorePort + 'static>(
    api: Arc<StoreApi<P>>,
    method: Method,
    uri: Uri,
    store_id: Option<String>,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return into_http(ApiResponse::no_content());
    }

    let mut request = ApiRequest::new(method.as_str(), uri.path());
    if let Some(id) = store_id {
        request = request.with_path_param(STORE_ID_PARAM, id);
    }
    if !body.is_empty() {
        match String::from_utf8(body.to_vec()) {
            Ok(text) => request = request.with_body(text),
            Err(e) => {
                let err = ApiError::invalid_request("Invalid JSON in request body")
                    .with_cause(format!("body is not UTF-8: {}", e));
                return into_http(api.reject(&err));
            }
        }
    }

    let response = match tokio::task::spawn_blocking(move || api.handle(&request)).await {
        Ok(response) => response,
        Err(_) => ApiResponse::error(&ApiError::unexpected()),
    };
    into_http(response)
}

/// Write an envelope out as an HTTP response.
pub fn into_http(response: ApiResponse) -> Response {
    let mut builder = axum::http::Response::builder().status(response.status());
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response<Body> {
    into_http(ApiResponse::error(&ApiError::unexpected()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::observability::{MemorySink, Telemetry};
    use crate::persistence::MemoryStore;

    fn server() -> HttpServer<MemoryStore> {
        let api = StoreApi::new(
            Settings::with_table("stores"),
            MemoryStore::new(),
            Telemetry::new(Arc::new(MemorySink::new())),
        );
        HttpServer::new(HttpServerConfig::with_port(8081), api)
    }

    #[test]
    fn test_server_creation() {
        assert_eq!(server().socket_addr(), "127.0.0.1:8081");
    }

    #[test]
    fn test_into_http_copies_envelope() {
        let response = into_http(ApiResponse::error(&ApiError::not_found("s1")));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-methods")
                .unwrap(),
            "GET,POST,PUT,DELETE,OPTIONS"
        );
    }

    #[test]
    fn test_panic_response_is_error_envelope() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
