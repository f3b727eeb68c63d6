//! Inbound request description
//!
//! One invocation carries `{method, path, pathParameters?, body?}`. The
//! `httpMethod` key is accepted as an alias for `method`.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};

/// HTTP-shaped request handed to `StoreApi::handle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    #[serde(alias = "httpMethod", default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(
        rename = "pathParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            path_parameters: None,
            body: None,
        }
    }

    pub fn with_path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// A non-empty path parameter.
    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Decode the body into `T`.
    ///
    /// An absent body reads as `{}`. Syntax errors and non-object bodies
    /// are `INVALID_REQUEST`; so are recognized fields of the wrong type.
    pub fn json_body<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let text = self.body.as_deref().unwrap_or("{}");
        let value: Value = serde_json::from_str(text).map_err(|e| {
            ApiError::invalid_request("Invalid JSON in request body").with_cause(e)
        })?;
        if !value.is_object() {
            return Err(invalid_body("request body must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| invalid_body(&e.to_string()))
    }
}

fn invalid_body(reason: &str) -> ApiError {
    ApiError::invalid_request("Invalid request body")
        .with_details(json!({ "reason": reason }))
        .with_cause(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ErrorCode;
    use crate::model::UpdateStoreRequest;

    #[test]
    fn test_deserializes_gateway_shape() {
        let raw = r#"{"httpMethod":"GET","path":"/stores/s1","pathParameters":{"store_id":"s1"},"body":null}"#;
        let request: ApiRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path_param("store_id"), Some("s1"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_null_path_parameters_are_empty() {
        let raw = r#"{"method":"POST","path":"/stores","pathParameters":null}"#;
        let request: ApiRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.path_param("store_id"), None);
    }

    #[test]
    fn test_absent_body_reads_as_empty_object() {
        let request = ApiRequest::new("PUT", "/stores/s1");
        let body: UpdateStoreRequest = request.json_body().unwrap();
        assert_eq!(body, UpdateStoreRequest::default());
    }

    #[test]
    fn test_malformed_json_is_invalid_request() {
        let request = ApiRequest::new("POST", "/stores").with_body("{not json");
        let err = request.json_body::<UpdateStoreRequest>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Invalid JSON in request body");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let request = ApiRequest::new("PUT", "/stores/s1").with_body(r#"["a","b"]"#);
        let err = request.json_body::<UpdateStoreRequest>().unwrap_err();
        assert_eq!(err.message(), "Invalid request body");
        assert!(err.details().is_some());
    }

    #[test]
    fn test_wrong_field_type_carries_reason() {
        let request = ApiRequest::new("PUT", "/stores/s1").with_body(r#"{"name": 7}"#);
        let err = request.json_body::<UpdateStoreRequest>().unwrap_err();
        let reason = err.details().unwrap()["reason"].as_str().unwrap();
        assert!(reason.contains("invalid type"));
    }
}
