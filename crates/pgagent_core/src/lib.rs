//! Schema introspection functions for PostgreSQL database workspaces.
//!
//! This crate provides the function layer behind `pgagent`:
//!
//! - **error**: Error taxonomy (connection, query, not-found)
//! - **models**: Function calls, invocations and connect options
//! - **services**: Secrets, scoped connections, catalog queries
//! - **workspace**: The callable `tables`, `table_columns` and `column_type` functions
//! - **logging**: Structured logging setup

pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod workspace;

pub use error::{ErrorInfo, WorkspaceError, WorkspaceResult};
pub use models::{ConnectOptions, Function, Invocation, WorkspaceCall, DEFAULT_SCHEMA};
pub use services::{
    EnvSecret, FileSecret, KeychainSecret, PlainSecret, SchemaIntrospector, ScopedConnection,
    Secret,
};
pub use workspace::DatabaseWorkspace;
