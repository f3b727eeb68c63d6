//! Route selection
//!
//! | Method   | Path                 | Operation |
//! |----------|----------------------|-----------|
//! | `POST`   | `/stores`            | Create    |
//! | `GET`    | `/stores/{store_id}` | Get       |
//! | `PUT`    | `/stores/{store_id}` | Update    |
//! | `DELETE` | `/stores/{store_id}` | Delete    |
//!
//! Item routes are selected by the `store_id` path parameter. Anything
//! else is `INVALID_REQUEST`.

use super::errors::{ApiError, ApiResult};
use super::request::ApiRequest;

pub const COLLECTION_PATH: &str = "/stores";
pub const STORE_ID_PARAM: &str = "store_id";

/// The operation selected for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Create,
    Get(String),
    Update(String),
    Delete(String),
}

impl Route {
    pub fn resolve(request: &ApiRequest) -> ApiResult<Route> {
        let store_id = request.path_param(STORE_ID_PARAM).map(str::to_string);
        let route = match (request.method.as_str(), store_id) {
            ("POST", _) if request.path == COLLECTION_PATH => Some(Route::Create),
            ("GET", Some(id)) => Some(Route::Get(id)),
            ("PUT", Some(id)) => Some(Route::Update(id)),
            ("DELETE", Some(id)) => Some(Route::Delete(id)),
            _ => None,
        };
        route.ok_or_else(|| ApiError::invalid_request("Invalid request path or method"))
    }

    /// Operation name used in telemetry records.
    pub fn operation(&self) -> &'static str {
        match self {
            Route::Create => "create_store",
            Route::Get(_) => "get_store",
            Route::Update(_) => "update_store",
            Route::Delete(_) => "delete_store",
        }
    }
}
