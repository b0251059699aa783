//! Connection parameters keyed by logical database and environment.

use super::{Environment, EnvironmentDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters needed to open a connection to a target database.
///
/// The password is excluded from `Debug` output and never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    database: String,
    username: String,
    #[serde(skip_serializing, default)]
    password: String,
}

impl ConnectionParams {
    /// Validates and builds connection parameters.
    ///
    /// An empty `database` means no default schema is selected on connect.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentDomainError`] when the host or username is blank
    /// or the port is zero.
    pub fn new(
        host: &str,
        port: u16,
        database: &str,
        username: &str,
        password: impl Into<String>,
    ) -> Result<Self, EnvironmentDomainError> {
        let host_name = host.trim();
        if host_name.is_empty() {
            return Err(EnvironmentDomainError::EmptyHost);
        }
        if port == 0 {
            return Err(EnvironmentDomainError::InvalidPort);
        }
        let user = username.trim();
        if user.is_empty() {
            return Err(EnvironmentDomainError::EmptyUsername);
        }
        Ok(Self {
            host: host_name.to_owned(),
            port,
            database: database.trim().to_owned(),
            username: user.to_owned(),
            password: password.into(),
        })
    }

    /// Returns the host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the default database, empty when none is selected.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns `host:port`, suitable for logs and error messages.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection parameters registered for one logical database in one
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    config_key: String,
    environment: Environment,
    connection: ConnectionParams,
    updated_at: DateTime<Utc>,
}

impl EnvironmentConfig {
    /// Creates a configuration entry stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentDomainError::EmptyConfigKey`] when the key is
    /// blank.
    pub fn new(
        config_key: &str,
        environment: Environment,
        connection: ConnectionParams,
        clock: &impl Clock,
    ) -> Result<Self, EnvironmentDomainError> {
        Self::from_persisted(config_key, environment, connection, clock.utc())
    }

    /// Reconstructs a configuration entry from storage.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentDomainError::EmptyConfigKey`] when the key is
    /// blank.
    pub fn from_persisted(
        config_key: &str,
        environment: Environment,
        connection: ConnectionParams,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, EnvironmentDomainError> {
        let key = config_key.trim();
        if key.is_empty() {
            return Err(EnvironmentDomainError::EmptyConfigKey);
        }
        Ok(Self {
            config_key: key.to_owned(),
            environment,
            connection,
            updated_at,
        })
    }

    /// Returns the logical database name this entry serves.
    #[must_use]
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    /// Returns the environment tag.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the connection parameters.
    #[must_use]
    pub const fn connection(&self) -> &ConnectionParams {
        &self.connection
    }

    /// Returns the time the entry was last written.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
