//! Create-payload validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! `store_id` present, `store_id` format, `name` present.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ApiError, ApiResult};
use crate::model::CreateStoreRequest;

const STORE_ID_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

fn store_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(STORE_ID_PATTERN).expect("store_id pattern is a valid regex"))
}

/// Whether `store_id` uses only letters, digits, `-` and `_`.
pub fn is_valid_store_id(store_id: &str) -> bool {
    store_id_regex().is_match(store_id)
}

/// Required fields of a create request, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreate<'a> {
    pub store_id: &'a str,
    pub name: &'a str,
}

pub fn validate_create(body: &CreateStoreRequest) -> ApiResult<ValidatedCreate<'_>> {
    let store_id = body
        .store_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::invalid_request("store_id is required"))?;

    if !is_valid_store_id(store_id) {
        return Err(ApiError::invalid_request(
            "store_id must contain only alphanumeric characters, hyphens, and underscores",
        ));
    }

    let name = body
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::invalid_request("name is required"))?;

    Ok(ValidatedCreate { store_id, name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(store_id: Option<&str>, name: Option<&str>) -> CreateStoreRequest {
        CreateStoreRequest {
            store_id: store_id.map(str::to_string),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_store_id_charset() {
        for ok in ["abc", "A-1", "under_score", "0"] {
            assert!(is_valid_store_id(ok), "{}", ok);
        }
        for bad in ["", "bad id!", "a/b", "dot.ted", "ünï", "a\n"] {
            assert!(!is_valid_store_id(bad), "{:?}", bad);
        }
    }

    #[test]
    fn test_missing_store_id_first() {
        let err = validate_create(&body(None, None)).unwrap_err();
        assert_eq!(err.message(), "store_id is required");
        let err = validate_create(&body(Some(""), Some("n"))).unwrap_err();
        assert_eq!(err.message(), "store_id is required");
    }

    #[test]
    fn test_format_checked_before_name() {
        let err = validate_create(&body(Some("bad id!"), None)).unwrap_err();
        assert!(err.message().starts_with("store_id must contain only"));
    }

    #[test]
    fn test_missing_or_empty_name() {
        let err = validate_create(&body(Some("ok"), None)).unwrap_err();
        assert_eq!(err.message(), "name is required");
        let err = validate_create(&body(Some("ok"), Some(""))).unwrap_err();
        assert_eq!(err.message(), "name is required");
    }

    #[test]
    fn test_valid_body() {
        let request = body(Some("s-1"), Some("Main"));
        let valid = validate_create(&request).unwrap();
        assert_eq!(valid.store_id, "s-1");
        assert_eq!(valid.name, "Main");
    }
}
