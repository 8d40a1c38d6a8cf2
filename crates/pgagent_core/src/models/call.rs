//! Workspace function calls as a host sends them.
//!
//! A host deserializes an invocation into [`WorkspaceCall`], with argument
//! defaults applied during deserialization:
//!
//! ```json
//! {"function": "tables"}
//! {"function": "table_columns", "schema": "public", "table": "users"}
//! {"function": "column_type", "table": "users", "column": "id"}
//! ```

use serde::{Deserialize, Serialize};

/// Schema used when a call does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// The functions a workspace exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    /// List table names in a schema
    Tables,
    /// List column names of a table
    TableColumns,
    /// Get the declared type of one column
    ColumnType,
}

impl Function {
    /// Name the host uses to invoke the function.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::TableColumns => "table_columns",
            Self::ColumnType => "column_type",
        }
    }

    /// One-line description for host function listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Tables => "Returns a list of tables in the database as a comma-separated string",
            Self::TableColumns => {
                "Returns a list of columns in a table as a comma-separated string"
            }
            Self::ColumnType => "Get the type of a column in a table as a string",
        }
    }

    /// All functions, in listing order.
    pub fn all() -> [Function; 3] {
        [Self::Tables, Self::TableColumns, Self::ColumnType]
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single function call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case", deny_unknown_fields)]
pub enum WorkspaceCall {
    /// `tables(schema = "public")`
    Tables {
        #[serde(default = "default_schema")]
        schema: String,
    },
    /// `table_columns(schema, table)`
    TableColumns { schema: String, table: String },
    /// `column_type(table, column, schema = "public")`
    ColumnType {
        table: String,
        column: String,
        #[serde(default = "default_schema")]
        schema: String,
    },
}

impl WorkspaceCall {
    /// Parse a call from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the function this call targets.
    pub fn function(&self) -> Function {
        match self {
            Self::Tables { .. } => Function::Tables,
            Self::TableColumns { .. } => Function::TableColumns,
            Self::ColumnType { .. } => Function::ColumnType,
        }
    }

    /// Get the schema this call targets.
    pub fn schema(&self) -> &str {
        match self {
            Self::Tables { schema }
            | Self::TableColumns { schema, .. }
            | Self::ColumnType { schema, .. } => schema,
        }
    }
}
