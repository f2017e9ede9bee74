//! Error types for keysql

use thiserror::Error;

/// Result type alias for keysql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for query compilation and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// The query description is missing a required part or has the wrong shape
    #[error("Malformed query spec: {0}")]
    MalformedSpec(String),

    /// An operator suffix was used with a value it has no SQL form for
    #[error("Unsupported operator '{operator}' for {tag} value on column '{column}'")]
    UnsupportedOperator {
        column: String,
        operator: String,
        tag: String,
    },

    /// The requested construct has no rendering in the configured dialect
    #[error("{feature} is not supported by the {dialect} dialect")]
    DialectMismatch { dialect: String, feature: String },

    /// A value cannot be rendered as a SQL literal
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error reported by the executor
    #[error("Execution error: {0}")]
    Execution(String),

    /// A hook refused to let the statement run
    #[error("Query aborted: {0}")]
    Aborted(String),
}

impl SqlError {
    /// Create a malformed spec error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSpec(message.into())
    }

    /// Create an unsupported operator error
    pub fn unsupported(
        column: impl Into<String>,
        operator: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self::UnsupportedOperator {
            column: column.into(),
            operator: operator.into(),
            tag: tag.into(),
        }
    }

    /// Create a dialect mismatch error
    pub fn dialect_mismatch(dialect: impl Into<String>, feature: impl Into<String>) -> Self {
        Self::DialectMismatch {
            dialect: dialect.into(),
            feature: feature.into(),
        }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is a malformed spec error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedSpec(_))
    }

    /// Check if this is an unsupported operator error
    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self, Self::UnsupportedOperator { .. })
    }

    /// Check if this is a dialect mismatch error
    pub fn is_dialect_mismatch(&self) -> bool {
        matches!(self, Self::DialectMismatch { .. })
    }
}

impl From<serde_json::Error> for SqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
