//! Backend services for pgagent workspaces.
//!
//! - `secrets` - Secret trait and its env/file/keychain/in-memory providers
//! - `connection` - One scoped connection per call, released on every exit path
//! - `introspect` - Catalog queries against `information_schema`

pub mod connection;
pub mod introspect;
pub mod secrets;

pub use connection::ScopedConnection;
pub use introspect::SchemaIntrospector;
pub use secrets::{EnvSecret, FileSecret, KeychainSecret, PlainSecret, Secret};
