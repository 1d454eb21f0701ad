//! Error types for sqlquery

use thiserror::Error;

/// Result type alias for query building operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for query building
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Statement rendered without a target table
    #[error("{statement} requires a target table")]
    MissingTable { statement: &'static str },

    /// UPDATE rendered without any SET column
    #[error("UPDATE requires at least one SET column")]
    EmptySet,

    /// Named bind key already registered (only under `BindCollision::Reject`)
    #[error("Duplicate bind key ':{0}'")]
    DuplicateBind(String),

    /// Placeholder count does not match the number of values supplied
    #[error("Placeholder mismatch: '{sql}' has {placeholders} placeholder(s), but {values} value(s) provided")]
    PlaceholderMismatch {
        sql: String,
        placeholders: usize,
        values: usize,
    },

    /// Clause or pagination variant not available in the dialect
    #[error("{dialect} does not support {feature}")]
    Unsupported {
        dialect: &'static str,
        feature: String,
    },

    /// Flag outside the statement's vocabulary for the dialect
    #[error("Flag {flag} is not valid for {dialect} {statement}")]
    UnsupportedFlag {
        flag: &'static str,
        dialect: &'static str,
        statement: &'static str,
    },

    /// Join type name that does not match any `JoinKind`
    #[error("Unknown join type '{0}'")]
    UnknownJoin(String),

    /// Configuration error
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl QueryError {
    /// Create an unsupported-feature error
    pub fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            feature: feature.into(),
        }
    }

    /// Create a placeholder mismatch error
    pub fn mismatch(sql: impl Into<String>, placeholders: usize, values: usize) -> Self {
        Self::PlaceholderMismatch {
            sql: sql.into(),
            placeholders,
            values,
        }
    }

    /// Check if this is a missing table error
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable { .. })
    }

    /// Check if this is a duplicate bind error
    pub fn is_duplicate_bind(&self) -> bool {
        matches!(self, Self::DuplicateBind(_))
    }

    /// Check if this is an unsupported feature or flag error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::UnsupportedFlag { .. })
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
