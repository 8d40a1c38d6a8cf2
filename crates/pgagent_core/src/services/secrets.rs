//! Connection secrets with pluggable providers.
//!
//! A workspace never holds a connection string. It holds a [`Secret`] and
//! asks it for the plaintext right before connecting:
//!
//! - **EnvSecret**: an environment variable, read on every reveal
//! - **FileSecret**: a file (e.g. a mounted secret), read on every reveal
//! - **KeychainSecret**: an OS keychain entry (macOS Keychain, Windows Credential
//!   Manager, Linux Secret Service)
//! - **PlainSecret**: an in-memory value supplied by an embedding host
//!
//! Providers do not cache. Plaintext is never logged and never appears in
//! `Debug` output.

use crate::error::WorkspaceError;

use keyring::Entry;
use std::fs;
use std::path::PathBuf;

/// Service name used for keychain entries.
pub const KEYRING_SERVICE: &str = "dev.pgagent.secrets";

/// Environment variable read when no other secret source is given.
pub const DEFAULT_SECRET_ENV: &str = "DATABASE_URL";

// ============================================================================
// Secret Trait
// ============================================================================

/// An opaque holder of a connection string.
pub trait Secret: Send + Sync {
    /// Return the plaintext connection string.
    ///
    /// Fails with a connection error when the secret is missing, empty, or
    /// the backing store refuses access.
    fn reveal(&self) -> Result<String, WorkspaceError>;

    /// A description safe to log (never the plaintext).
    fn describe(&self) -> String;
}

fn non_empty(describe: impl FnOnce() -> String, value: String) -> Result<String, WorkspaceError> {
    if value.trim().is_empty() {
        return Err(WorkspaceError::connection_with_hint(
            format!("Secret {} is empty", describe()),
            "Provide a PostgreSQL connection string",
        ));
    }
    Ok(value)
}

// ============================================================================
// EnvSecret
// ============================================================================

/// Secret read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    /// Create a secret backed by the named variable.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_ENV)
    }
}

impl Secret for EnvSecret {
    fn reveal(&self) -> Result<String, WorkspaceError> {
        match std::env::var(&self.var) {
            Ok(value) => non_empty(|| self.describe(), value),
            Err(std::env::VarError::NotPresent) => Err(WorkspaceError::connection_with_hint(
                format!("Secret {} is not set", self.describe()),
                format!("Export {} with a PostgreSQL connection string", self.var),
            )),
            Err(e) => Err(WorkspaceError::connection_with_source(
                format!("Failed to reveal secret {}", self.describe()),
                e,
            )),
        }
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

// ============================================================================
// FileSecret
// ============================================================================

/// Secret read from a file; surrounding whitespace is trimmed.
#[derive(Debug, Clone)]
pub struct FileSecret {
    path: PathBuf,
}

impl FileSecret {
    /// Create a secret backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Secret for FileSecret {
    fn reveal(&self) -> Result<String, WorkspaceError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            WorkspaceError::connection_with_source(
                format!("Failed to reveal secret {}", self.describe()),
                e,
            )
        })?;
        non_empty(|| self.describe(), contents.trim().to_string())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

// ============================================================================
// KeychainSecret
// ============================================================================

/// Secret stored in the OS keychain.
#[derive(Debug, Clone)]
pub struct KeychainSecret {
    service: String,
    account: String,
}

impl KeychainSecret {
    /// Create a secret for `account` under the default service name.
    pub fn new(account: impl Into<String>) -> Self {
        Self::with_service(KEYRING_SERVICE, account)
    }

    /// Create a secret under a custom service name.
    pub fn with_service(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    /// Store a connection string for this entry.
    pub fn store(&self, value: &str) -> Result<(), WorkspaceError> {
        Entry::new(&self.service, &self.account)
            .and_then(|entry| entry.set_password(value))
            .map_err(|e| {
                WorkspaceError::connection_with_source(
                    format!("Failed to store secret {}", self.describe()),
                    e,
                )
            })?;
        tracing::debug!(secret = %self.describe(), "Secret stored in keychain");
        Ok(())
    }
}

impl Secret for KeychainSecret {
    fn reveal(&self) -> Result<String, WorkspaceError> {
        let entry = Entry::new(&self.service, &self.account).map_err(|e| {
            WorkspaceError::connection_with_source(
                format!("Failed to open keychain entry {}", self.describe()),
                e,
            )
        })?;

        match entry.get_password() {
            Ok(value) => non_empty(|| self.describe(), value),
            Err(keyring::Error::NoEntry) => Err(WorkspaceError::connection_with_hint(
                format!("Secret {} does not exist", self.describe()),
                "The secret may have been revoked; store it again",
            )),
            Err(e) => Err(WorkspaceError::connection_with_source(
                format!("Failed to reveal secret {}", self.describe()),
                e,
            )),
        }
    }

    fn describe(&self) -> String {
        format!("keychain:{}/{}", self.service, self.account)
    }
}

// ============================================================================
// PlainSecret
// ============================================================================

/// In-memory secret handed over by an embedding host.
#[derive(Clone)]
pub struct PlainSecret {
    value: String,
}

impl PlainSecret {
    /// Wrap a plaintext connection string.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl Secret for PlainSecret {
    fn reveal(&self) -> Result<String, WorkspaceError> {
        non_empty(|| self.describe(), self.value.clone())
    }

    fn describe(&self) -> String {
        "plain".to_string()
    }
}

impl std::fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainSecret").field("value", &"<redacted>").finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
