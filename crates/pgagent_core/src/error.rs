//! Error types for pgagent workspaces.
//!
//! Every failure a workspace function can produce falls into one of three
//! kinds the caller can act on:
//!
//! - **Connection**: the secret could not be revealed or the server could not be reached
//! - **Query**: the catalog query or row decoding failed
//! - **NotFound**: a column-type lookup matched no usable row
//!
//! Cancellation and configuration failures have their own variants.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for workspace functions.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The credential could not be revealed or the connection could not be established.
    #[error("Connection error: {message}")]
    Connection {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution or row decoding failed, with PostgreSQL details when available.
    #[error("{message}")]
    Query {
        /// PostgreSQL error message.
        message: String,
        /// Additional detail from PostgreSQL.
        detail: Option<String>,
        /// PostgreSQL hint.
        hint: Option<String>,
        /// Position in query (1-indexed).
        position: Option<usize>,
        /// PostgreSQL error code (e.g., "42501").
        code: Option<String>,
    },

    /// A column-type lookup matched no row, or the row carried an empty type.
    #[error("column type {column} not found in table {table}")]
    NotFound {
        /// Table that was searched.
        table: String,
        /// Column that was looked up.
        column: String,
    },

    /// The invocation was cancelled by its caller.
    #[error("Invocation cancelled")]
    Cancelled {
        /// ID of the cancelled invocation.
        invocation_id: Uuid,
    },

    /// Invalid configuration value.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },
}

/// Convenience alias used throughout the crate.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

impl WorkspaceError {
    // ========== Constructors ==========

    /// Create a new connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), hint: None, source: None }
    }

    /// Create a new connection error with a custom hint.
    pub fn connection_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), hint: Some(hint.into()), source: None }
    }

    /// Create a new connection error with source.
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), hint: None, source: Some(Box::new(source)) }
    }

    /// Classify an error raised while establishing a connection.
    ///
    /// Anything that happens before the first query is a connection error,
    /// including server-side rejections such as bad passwords.
    pub fn connect_failed(err: tokio_postgres::Error) -> Self {
        let (message, hint) = match err.as_db_error() {
            Some(db_err) => {
                let hint = match db_err.code().code() {
                    "28P01" => Some("Invalid password - check the connection string".to_string()),
                    "28000" => {
                        Some("Authentication failed - check username and permissions".to_string())
                    }
                    "3D000" => Some("The database named in the connection string does not exist".to_string()),
                    _ => db_err.hint().map(String::from),
                };
                (db_err.message().to_string(), hint)
            }
            None => (err.to_string(), None),
        };
        Self::Connection { message, hint, source: Some(Box::new(err)) }
    }

    /// Create a new query error with full PostgreSQL details.
    pub fn query(
        message: impl Into<String>,
        detail: Option<String>,
        hint: Option<String>,
        position: Option<usize>,
        code: Option<String>,
    ) -> Self {
        Self::Query { message: message.into(), detail, hint, position, code }
    }

    /// Create a not-found error for a column-type lookup.
    pub fn not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::NotFound { table: table.into(), column: column.into() }
    }

    /// Create a cancelled error.
    pub fn cancelled(invocation_id: Uuid) -> Self {
        Self::Cancelled { invocation_id }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    // ========== Methods ==========

    /// Check if this error is a connection failure.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this error is a query failure.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    /// Check if this error is a not-found lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error represents a cancelled invocation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "Connection",
            Self::Query { .. } => "Query",
            Self::NotFound { .. } => "NotFound",
            Self::Cancelled { .. } => "Cancelled",
            Self::Config { .. } => "Config",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Connection { hint, .. } => {
                hint.as_deref().or(Some("Check that the database server is running"))
            }
            Self::Query { hint, .. } => hint.as_deref(),
            Self::NotFound { .. } => Some("Check the schema, table and column names"),
            Self::Cancelled { .. } => None,
            Self::Config { .. } => None,
        }
    }

    /// Get PostgreSQL error code (if applicable).
    pub fn pg_code(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Get position in query (if applicable).
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Query { position, .. } => *position,
            _ => None,
        }
    }

    /// Convert to user-displayable error info.
    pub fn to_error_info(&self) -> ErrorInfo {
        let error_type = format!("{} Error", self.category());
        let message = self.to_string();
        let hint = self.hint().map(String::from);

        let technical_detail = match self {
            Self::Query { detail, code, position, .. } => {
                let mut parts = Vec::new();
                if let Some(code) = code {
                    parts.push(format!("Code: {code}"));
                }
                if let Some(pos) = position {
                    parts.push(format!("Position: {pos}"));
                }
                if let Some(detail) = detail {
                    parts.push(format!("Detail: {detail}"));
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n"))
                }
            }
            Self::Connection { source: Some(source), .. } => Some(source.to_string()),
            _ => None,
        };

        ErrorInfo { error_type, message, hint, technical_detail }
    }
}

/// User-displayable error information.
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Category name (e.g., "Connection Error").
    pub error_type: String,
    /// User-friendly message.
    pub message: String,
    /// Actionable suggestion.
    pub hint: Option<String>,
    /// Technical detail, printed on request.
    pub technical_detail: Option<String>,
}

// ========== Error Conversions ==========

/// Convert a failure on an established connection into a query error.
///
/// A connection dropped mid-query still counts as a query failure: the
/// connection was established and the statement is what failed.
impl From<tokio_postgres::Error> for WorkspaceError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let position = db_err.position().and_then(|p| match p {
                tokio_postgres::error::ErrorPosition::Original(pos) => Some(*pos as usize),
                tokio_postgres::error::ErrorPosition::Internal { .. } => None,
            });
            return WorkspaceError::Query {
                message: db_err.message().to_string(),
                detail: db_err.detail().map(String::from),
                hint: db_err.hint().map(String::from),
                position,
                code: Some(db_err.code().code().to_string()),
            };
        }

        if err.is_closed() {
            return WorkspaceError::Query {
                message: "Connection closed while running query".to_string(),
                detail: Some(err.to_string()),
                hint: Some("The server may have restarted or dropped the session".to_string()),
                position: None,
                code: None,
            };
        }

        WorkspaceError::Query {
            message: err.to_string(),
            detail: None,
            hint: None,
            position: None,
            code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_column_and_table() {
        let err = WorkspaceError::not_found("users", "missing");
        assert_eq!(err.to_string(), "column type missing not found in table users");
        assert!(err.is_not_found());
        assert_eq!(err.category(), "NotFound");
    }

    #[test]
    fn test_connection_hint_falls_back_to_default() {
        let err = WorkspaceError::connection("refused");
        assert_eq!(err.hint(), Some("Check that the database server is running"));

        let err = WorkspaceError::connection_with_hint("revoked", "Rotate the secret");
        assert_eq!(err.hint(), Some("Rotate the secret"));
        assert!(err.is_connection());
    }

    #[test]
    fn test_query_error_info_includes_details() {
        let err = WorkspaceError::query(
            "permission denied for schema private",
            Some("role lacks USAGE".to_string()),
            None,
            Some(15),
            Some("42501".to_string()),
        );

        assert_eq!(err.pg_code(), Some("42501"));
        assert_eq!(err.position(), Some(15));

        let info = err.to_error_info();
        assert_eq!(info.error_type, "Query Error");
        assert_eq!(info.message, "permission denied for schema private");
        let detail = info.technical_detail.unwrap();
        assert!(detail.contains("Code: 42501"));
        assert!(detail.contains("Position: 15"));
        assert!(detail.contains("Detail: role lacks USAGE"));
    }

    #[test]
    fn test_cancelled_carries_invocation_id() {
        let id = Uuid::new_v4();
        let err = WorkspaceError::cancelled(id);
        assert!(err.is_cancelled());
        assert!(matches!(err, WorkspaceError::Cancelled { invocation_id } if invocation_id == id));
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_connection_error_info_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = WorkspaceError::connection_with_source("Failed to reveal secret", io);
        let info = err.to_error_info();
        assert_eq!(info.error_type, "Connection Error");
        assert_eq!(info.technical_detail.as_deref(), Some("no such file"));
    }
}
