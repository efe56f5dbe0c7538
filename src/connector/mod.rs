//! Connector capability
//!
//! The probe engine never opens sockets itself. It is handed a [`Connector`]
//! that turns a host identifier into a live [`Connection`], so credentials,
//! TLS mode and driver details stay with the caller.
//!
//! - [`PgConnector`]: PostgreSQL implementation backed by sqlx
//! - [`connect_fn`]: adapts a plain async closure into a connector

mod postgres;

use std::future::Future;

use async_trait::async_trait;

pub use postgres::{PgConnection, PgConnector};

/// Error raised by a connector or a connection handle
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Ping failed: {0}")]
    Ping(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Close failed: {0}")]
    Close(String),
    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

/// Maps a host identifier to a live connection handle
#[async_trait]
pub trait Connector: Send + Sync {
    /// Handle type produced by this connector
    type Connection: Connection;

    /// Open a connection to `host`
    ///
    /// Called once per probed host, sequentially within one scan.
    async fn connect(&self, host: &str) -> Result<Self::Connection, ConnectionError>;
}

/// An open connection, exclusively owned by one probe
#[async_trait]
pub trait Connection: Send {
    /// Liveness round-trip
    async fn ping(&mut self) -> Result<(), ConnectionError>;

    /// Ask the server whether it is currently a read-only replica
    async fn is_replica(&mut self) -> Result<bool, ConnectionError>;

    /// Release the connection
    ///
    /// Consumes the handle, so a handle is released at most once.
    async fn close(self) -> Result<(), ConnectionError>;
}

/// Connector built from an async closure, see [`connect_fn`]
#[derive(Clone)]
pub struct ConnectFn<F> {
    f: F,
}

/// Wrap `f` as a [`Connector`]
///
/// ```ignore
/// let connector = connect_fn(|host: String| async move { open(&host).await });
/// ```
pub fn connect_fn<F>(f: F) -> ConnectFn<F> {
    ConnectFn { f }
}

#[async_trait]
impl<F, Fut, C> Connector for ConnectFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<C, ConnectionError>> + Send + 'static,
    C: Connection,
{
    type Connection = C;

    async fn connect(&self, host: &str) -> Result<C, ConnectionError> {
        (self.f)(host.to_string()).await
    }
}
