//! PostgreSQL connector
//!
//! Role is read from `pg_is_in_recovery()`: a standby (streaming or archive
//! recovery) answers `true`, the writable primary answers `false`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection as _, PgConnection as RawPgConnection};
use tracing::debug;

use crate::config::{PostgresConfig, SslMode};

use super::{Connection, ConnectionError, Connector};

/// Role introspection query, single boolean column
const ROLE_QUERY: &str = "SELECT pg_is_in_recovery()";

/// How long a graceful Terminate may take before the socket is just dropped
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Connector that opens one PostgreSQL session per probed host
///
/// Holds a template of connection options; each `connect` call only swaps in
/// the host (and port, when the identifier carries one).
#[derive(Debug, Clone)]
pub struct PgConnector {
    options: PgConnectOptions,
}

impl PgConnector {
    /// Create from prebuilt sqlx options
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options: options.disable_statement_logging(),
        }
    }

    /// Build the option template from configuration
    pub fn from_config(config: &PostgresConfig) -> Self {
        let mut options = PgConnectOptions::new()
            .port(config.port)
            .username(&config.user)
            .database(&config.database)
            .ssl_mode(ssl_mode(config.ssl_mode))
            .application_name(&config.application_name);

        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        Self::new(options)
    }

    /// Options for one host identifier
    fn options_for(&self, host: &str) -> Result<PgConnectOptions, ConnectionError> {
        let (host, port) = split_host_port(host)?;
        let mut options = self.options.clone().host(host);
        if let Some(port) = port {
            options = options.port(port);
        }
        Ok(options)
    }
}

impl From<&PostgresConfig> for PgConnector {
    fn from(config: &PostgresConfig) -> Self {
        Self::from_config(config)
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgConnection;

    async fn connect(&self, host: &str) -> Result<PgConnection, ConnectionError> {
        let options = self.options_for(host)?;
        debug!(host = %host, "Connecting to PostgreSQL");

        let conn = options
            .connect()
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;

        Ok(PgConnection { conn })
    }
}

/// A single PostgreSQL session opened by [`PgConnector`]
pub struct PgConnection {
    conn: RawPgConnection,
}

#[async_trait]
impl Connection for PgConnection {
    async fn ping(&mut self) -> Result<(), ConnectionError> {
        self.conn
            .ping()
            .await
            .map_err(|e| ConnectionError::Ping(e.to_string()))
    }

    async fn is_replica(&mut self) -> Result<bool, ConnectionError> {
        sqlx::query_scalar::<_, bool>(ROLE_QUERY)
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| ConnectionError::Query(e.to_string()))
    }

    async fn close(self) -> Result<(), ConnectionError> {
        match tokio::time::timeout(CLOSE_GRACE, self.conn.close()).await {
            Ok(result) => result.map_err(|e| ConnectionError::Close(e.to_string())),
            Err(_) => {
                // Dropping the unfinished close drops the socket as well
                debug!("Graceful close timed out, dropping connection");
                Ok(())
            }
        }
    }
}

fn ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow => PgSslMode::Allow,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
        SslMode::VerifyCa => PgSslMode::VerifyCa,
        SslMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

/// Split a host identifier into host and optional port
///
/// Accepts `host`, `host:port`, `[v6]`, `[v6]:port`, a bare IPv6 literal
/// and unix socket directories.
fn split_host_port(host: &str) -> Result<(&str, Option<u16>), ConnectionError> {
    if host.is_empty() {
        return Err(ConnectionError::InvalidHost("empty host".into()));
    }

    if let Some(rest) = host.strip_prefix('[') {
        let (addr, tail) = rest
            .split_once(']')
            .ok_or_else(|| ConnectionError::InvalidHost(format!("unclosed bracket: {}", host)))?;
        if tail.is_empty() {
            return Ok((addr, None));
        }
        let port = tail
            .strip_prefix(':')
            .ok_or_else(|| ConnectionError::InvalidHost(host.to_string()))?;
        return Ok((addr, Some(parse_port(host, port)?)));
    }

    match host.rsplit_once(':') {
        // More than one colon without brackets: bare IPv6 literal
        Some((addr, port)) if !addr.contains(':') => Ok((addr, Some(parse_port(host, port)?))),
        _ => Ok((host, None)),
    }
}

fn parse_port(host: &str, port: &str) -> Result<u16, ConnectionError> {
    port.parse::<u16>()
        .map_err(|_| ConnectionError::InvalidHost(format!("invalid port in {}", host)))
}
