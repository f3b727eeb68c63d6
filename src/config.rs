//! Service settings
//!
//! The only required setting is the table that holds store records. It is
//! read from `STORE_TABLE_NAME`; an unset or empty value is not an error
//! until the first operation needs the table.

use thiserror::Error;

/// Environment variable naming the store table.
pub const TABLE_NAME_VAR: &str = "STORE_TABLE_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("store table is not configured (set {var})")]
    MissingTable { var: &'static str },
}

/// Settings shared by every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    table_name: Option<String>,
}

impl Settings {
    pub fn new(table_name: Option<String>) -> Self {
        Self {
            table_name: table_name.filter(|name| !name.trim().is_empty()),
        }
    }

    pub fn with_table(table_name: impl Into<String>) -> Self {
        Self::new(Some(table_name.into()))
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(TABLE_NAME_VAR))
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// The table name, or the fatal configuration error.
    pub fn require_table(&self) -> Result<&str, ConfigError> {
        self.table_name().ok_or(ConfigError::MissingTable {
            var: TABLE_NAME_VAR,
        })
    }
}
