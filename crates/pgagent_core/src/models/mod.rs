//! Data models for pgagent workspaces.
//!
//! - `call` - Function, WorkspaceCall, argument defaults
//! - `connection` - ConnectOptions
//! - `invocation` - Invocation tracking and cancellation

pub mod call;
pub mod connection;
pub mod invocation;

pub use call::{Function, WorkspaceCall, DEFAULT_SCHEMA};
pub use connection::ConnectOptions;
pub use invocation::Invocation;
