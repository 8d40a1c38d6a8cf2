//! Schema introspection via `information_schema`.
//!
//! Each lookup is a single read-only, parameterized query. Listings keep the
//! order the server returns rows in; no sort is applied.

use crate::error::WorkspaceError;
use crate::services::connection::ScopedConnection;

/// Table names in a schema.
pub const LIST_TABLES_SQL: &str =
    "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1";

/// Column names of a table.
pub const LIST_COLUMNS_SQL: &str = "SELECT column_name::text FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2";

/// Declared type of a single column.
pub const COLUMN_TYPE_SQL: &str = "SELECT data_type::text FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2 AND column_name = $3";

/// Schema introspection service.
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// List table names in `schema`.
    ///
    /// A schema without tables, and a schema that does not exist, both
    /// produce an empty list.
    pub async fn list_tables(
        conn: &ScopedConnection,
        schema: &str,
    ) -> Result<Vec<String>, WorkspaceError> {
        let names = conn.query_text_column(LIST_TABLES_SQL, &[schema]).await?;
        Ok(names.into_iter().flatten().collect())
    }

    /// List column names of `schema.table`.
    ///
    /// An unknown table is indistinguishable from a table with no columns.
    pub async fn list_columns(
        conn: &ScopedConnection,
        schema: &str,
        table: &str,
    ) -> Result<Vec<String>, WorkspaceError> {
        let names = conn.query_text_column(LIST_COLUMNS_SQL, &[schema, table]).await?;
        Ok(names.into_iter().flatten().collect())
    }

    /// Get the declared data type of `schema.table.column`.
    ///
    /// No matching row, or a row with a NULL/empty type, is a not-found error.
    pub async fn column_type(
        conn: &ScopedConnection,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<String, WorkspaceError> {
        let types = conn.query_text_column(COLUMN_TYPE_SQL, &[schema, table, column]).await?;
        first_type(types).ok_or_else(|| WorkspaceError::not_found(table, column))
    }
}

/// Pick the type from the first row, if it carries one.
fn first_type(types: Vec<Option<String>>) -> Option<String> {
    types.into_iter().next().flatten().filter(|t| !t.is_empty())
}

/// Join listing results the way workspace functions return them.
pub fn join_names(names: &[String]) -> String {
    names.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&[]), "");
        assert_eq!(join_names(&["users".to_string()]), "users");
        assert_eq!(join_names(&["id".to_string(), "email".to_string()]), "id,email");
    }

    #[test]
    fn test_first_type_uses_first_row() {
        let types = vec![Some("integer".to_string()), Some("text".to_string())];
        assert_eq!(first_type(types), Some("integer".to_string()));
    }

    #[test]
    fn test_first_type_treats_missing_and_empty_alike() {
        assert_eq!(first_type(vec![]), None);
        assert_eq!(first_type(vec![None]), None);
        assert_eq!(first_type(vec![Some(String::new())]), None);
    }

    #[test]
    fn test_queries_are_parameterized_selects() {
        for sql in [LIST_TABLES_SQL, LIST_COLUMNS_SQL, COLUMN_TYPE_SQL] {
            assert!(sql.starts_with("SELECT "));
            assert!(sql.contains("information_schema."));
            assert!(sql.contains("$1"));
            assert!(!sql.contains("ORDER BY"));
        }
        assert!(COLUMN_TYPE_SQL.contains("$3"));
    }
}
