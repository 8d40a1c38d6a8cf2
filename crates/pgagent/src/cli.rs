//! CLI argument parsing using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use pgagent_core::services::secrets::DEFAULT_SECRET_ENV;
use pgagent_core::{EnvSecret, FileSecret, KeychainSecret, Secret, WorkspaceCall, DEFAULT_SCHEMA};
use std::path::PathBuf;
use std::sync::Arc;

/// pgagent - inspect tables, columns and column types of a PostgreSQL database
#[derive(Parser, Debug)]
#[command(name = "pgagent")]
#[command(about = "Inspect a PostgreSQL schema through information_schema", long_about = None)]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub secret: SecretArgs,

    /// Log filter (overrides PGAGENT_LOG and RUST_LOG)
    #[arg(long, value_name = "FILTER", global = true)]
    pub log: Option<String>,

    /// Print technical error details on failure
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the connection string comes from.
#[derive(ClapArgs, Debug)]
#[group(multiple = false)]
pub struct SecretArgs {
    /// Environment variable holding the connection string
    #[arg(long, value_name = "VAR", default_value = DEFAULT_SECRET_ENV)]
    pub secret_env: String,

    /// File holding the connection string
    #[arg(long, value_name = "PATH")]
    pub secret_file: Option<PathBuf>,

    /// OS keychain account holding the connection string
    #[arg(long, value_name = "ACCOUNT")]
    pub secret_keychain: Option<String>,
}

impl SecretArgs {
    /// Build the secret the workspace reveals on every call.
    pub fn to_secret(&self) -> Arc<dyn Secret> {
        if let Some(path) = &self.secret_file {
            Arc::new(FileSecret::new(path))
        } else if let Some(account) = &self.secret_keychain {
            Arc::new(KeychainSecret::new(account))
        } else {
            Arc::new(EnvSecret::new(&self.secret_env))
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tables in a schema as a comma-separated string
    Tables {
        /// Schema to list
        #[arg(long, default_value = DEFAULT_SCHEMA)]
        schema: String,
    },

    /// List columns of a table as a comma-separated string
    TableColumns {
        /// Schema containing the table
        #[arg(long)]
        schema: String,

        /// Table to list
        #[arg(long)]
        table: String,
    },

    /// Get the type of a column in a table
    ColumnType {
        /// Table containing the column
        #[arg(long)]
        table: String,

        /// Column to look up
        #[arg(long)]
        column: String,

        /// Schema containing the table
        #[arg(long, default_value = DEFAULT_SCHEMA)]
        schema: String,
    },

    /// Run a call given as JSON, e.g. '{"function": "tables", "schema": "public"}'
    Call {
        /// The call envelope
        #[arg(value_name = "JSON")]
        json: String,
    },

    /// Store a connection string in the OS keychain
    StoreSecret {
        /// Keychain account to store under
        #[arg(long, value_name = "ACCOUNT")]
        account: String,

        /// Read the connection string from this environment variable
        #[arg(long, value_name = "VAR", default_value = DEFAULT_SECRET_ENV)]
        from_env: String,
    },

    /// List the functions a workspace exposes
    Functions,
}

impl Command {
    /// Convert a lookup subcommand into a workspace call.
    ///
    /// Returns `Ok(None)` for subcommands that do not call a workspace function.
    pub fn to_call(&self) -> Result<Option<WorkspaceCall>, serde_json::Error> {
        let call = match self {
            Command::Tables { schema } => WorkspaceCall::Tables { schema: schema.clone() },
            Command::TableColumns { schema, table } => {
                WorkspaceCall::TableColumns { schema: schema.clone(), table: table.clone() }
            }
            Command::ColumnType { table, column, schema } => WorkspaceCall::ColumnType {
                table: table.clone(),
                column: column.clone(),
                schema: schema.clone(),
            },
            Command::Call { json } => WorkspaceCall::from_json(json)?,
            Command::StoreSecret { .. } | Command::Functions => return Ok(None),
        };
        Ok(Some(call))
    }
}
