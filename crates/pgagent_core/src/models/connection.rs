//! Connection options applied on top of a revealed connection string.

use crate::error::WorkspaceError;

use std::time::Duration;

/// Environment variable overriding the application name.
pub const APPLICATION_NAME_ENV: &str = "PGAGENT_APPLICATION_NAME";

/// Environment variable setting a connect timeout in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "PGAGENT_CONNECT_TIMEOUT_SECS";

/// Environment variable disabling the read-only session guard ("0" or "false").
pub const READ_ONLY_ENV: &str = "PGAGENT_READ_ONLY";

/// Options layered onto every connection a workspace opens.
///
/// Values set explicitly in the connection string always win; these only
/// fill the gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Application name sent to PostgreSQL
    pub application_name: String,
    /// Connection timeout in seconds (None = wait as long as the caller does)
    pub connect_timeout_secs: Option<u64>,
    /// Open sessions with `default_transaction_read_only=on`
    pub read_only: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { application_name: "pgagent".to_string(), connect_timeout_secs: None, read_only: true }
    }
}

impl ConnectOptions {
    /// Load options from the process environment.
    pub fn from_env() -> Result<Self, WorkspaceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load options from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WorkspaceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(name) = lookup(APPLICATION_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            options.application_name = name.trim().to_string();
        }

        if let Some(raw) = lookup(CONNECT_TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                WorkspaceError::config(format!(
                    "{CONNECT_TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                return Err(WorkspaceError::config(format!(
                    "{CONNECT_TIMEOUT_ENV} must be greater than zero"
                )));
            }
            options.connect_timeout_secs = Some(secs);
        }

        if let Some(raw) = lookup(READ_ONLY_ENV) {
            options.read_only = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" => false,
                other => {
                    return Err(WorkspaceError::config(format!(
                        "{READ_ONLY_ENV} must be a boolean, got '{other}'"
                    )))
                }
            };
        }

        Ok(options)
    }

    /// Set the application name.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = Some(secs);
        self
    }

    /// Set read-only mode.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Get the connection timeout as a duration.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    /// Fill unset fields of a parsed connection config.
    pub fn apply(&self, config: &mut tokio_postgres::Config) {
        if config.get_application_name().is_none() {
            config.application_name(&self.application_name);
        }
        if config.get_connect_timeout().is_none() {
            if let Some(timeout) = self.connect_timeout() {
                config.connect_timeout(timeout);
            }
        }
        if self.read_only {
            match config.get_options().map(str::to_string) {
                None => {
                    config.options(READ_ONLY_OPTION);
                }
                // An explicit setting in the connection string wins.
                Some(existing) if existing.contains("default_transaction_read_only") => {}
                Some(existing) => {
                    config.options(&format!("{existing} {READ_ONLY_OPTION}"));
                }
            }
        }
    }
}

const READ_ONLY_OPTION: &str = "-c default_transaction_read_only=on";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let options = ConnectOptions::from_lookup(lookup(&[])).unwrap();
        assert_eq!(options, ConnectOptions::default());
        assert_eq!(options.application_name, "pgagent");
        assert!(options.connect_timeout().is_none());
        assert!(options.read_only);
    }

    #[test]
    fn test_environment_overrides() {
        let options = ConnectOptions::from_lookup(lookup(&[
            (APPLICATION_NAME_ENV, "schema-bot"),
            (CONNECT_TIMEOUT_ENV, " 15 "),
            (READ_ONLY_ENV, "false"),
        ]))
        .unwrap();

        assert_eq!(options.application_name, "schema-bot");
        assert_eq!(options.connect_timeout(), Some(Duration::from_secs(15)));
        assert!(!options.read_only);
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let err = ConnectOptions::from_lookup(lookup(&[(CONNECT_TIMEOUT_ENV, "soon")])).unwrap_err();
        assert_eq!(err.category(), "Config");

        let err = ConnectOptions::from_lookup(lookup(&[(CONNECT_TIMEOUT_ENV, "0")])).unwrap_err();
        assert_eq!(err.category(), "Config");
    }

    #[test]
    fn test_apply_keeps_values_from_connection_string() {
        let mut config: tokio_postgres::Config =
            "host=localhost user=app application_name=custom connect_timeout=3".parse().unwrap();
        ConnectOptions::default().with_connect_timeout_secs(30).apply(&mut config);

        assert_eq!(config.get_application_name(), Some("custom"));
        assert_eq!(config.get_connect_timeout(), Some(&Duration::from_secs(3)));
        assert_eq!(config.get_options(), Some("-c default_transaction_read_only=on"));
    }

    #[test]
    fn test_read_only_guard_extends_existing_options() {
        let mut config: tokio_postgres::Config =
            "host=localhost user=app options='-c search_path=app'".parse().unwrap();
        ConnectOptions::default().apply(&mut config);

        assert_eq!(
            config.get_options(),
            Some("-c search_path=app -c default_transaction_read_only=on")
        );
    }

    #[test]
    fn test_read_only_setting_in_connection_string_wins() {
        let mut config: tokio_postgres::Config =
            "host=localhost user=app options='-c default_transaction_read_only=off'"
                .parse()
                .unwrap();
        ConnectOptions::default().apply(&mut config);

        assert_eq!(config.get_options(), Some("-c default_transaction_read_only=off"));
    }

    #[test]
    fn test_apply_fills_missing_values() {
        let mut config: tokio_postgres::Config =
            "postgres://app@localhost/appdb".parse().unwrap();
        ConnectOptions::default()
            .with_application_name("introspector")
            .with_connect_timeout_secs(7)
            .with_read_only(false)
            .apply(&mut config);

        assert_eq!(config.get_application_name(), Some("introspector"));
        assert_eq!(config.get_connect_timeout(), Some(&Duration::from_secs(7)));
        assert_eq!(config.get_options(), None);
    }
}
