//! Locate the writable PostgreSQL primary among candidate hosts
//!
//! Given an ordered host list, a per-host timeout and a [`Connector`], the
//! lookup probes hosts one at a time and returns the first one that is alive
//! and not in recovery. Hosts that are unreachable, slow, erroring or
//! read-only are skipped.
//!
//! ```ignore
//! use std::time::Duration;
//! use pgmaster::{find_master, PgConnector};
//! use pgmaster::config::PostgresConfig;
//!
//! let connector = PgConnector::from_config(&PostgresConfig::default());
//! let master = find_master(&connector, Duration::from_secs(2), &["10.0.0.1", "10.0.0.2"]).await?;
//! ```

pub mod config;
pub mod connector;
pub mod metrics;
pub mod probe;

pub use connector::{connect_fn, Connection, ConnectionError, Connector, PgConnection, PgConnector};
pub use probe::{find_master, FindError, MasterFinder, ProbeObserver, ProbeOutcome};
