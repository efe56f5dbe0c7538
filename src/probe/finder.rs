//! Sequential master scan with a bounded per-host window

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::connector::{Connection, Connector};

use super::outcome::{ProbeObserver, ProbeOutcome};

/// Deadline used when `now + timeout` overflows
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Error returned by a master lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FindError {
    #[error("No hosts provided")]
    NoHosts,
    #[error("Master not found")]
    NotFound,
}

/// Finds the writable primary among candidate hosts
///
/// Stateless between calls: concurrent `find` calls with different host
/// lists share nothing but the connector.
pub struct MasterFinder<C> {
    connector: C,
    /// Window for one host (connect + ping + role query)
    timeout: Duration,
    observer: Option<Arc<dyn ProbeObserver>>,
}

impl<C: Connector> MasterFinder<C> {
    pub fn new(connector: C, timeout: Duration) -> Self {
        Self {
            connector,
            timeout,
            observer: None,
        }
    }

    /// Attach an observer that sees every per-host outcome
    pub fn with_observer(mut self, observer: Arc<dyn ProbeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Per-host window
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return the first host in `hosts` that is a writable primary
    ///
    /// Hosts are probed strictly in order, one at a time, and the scan stops
    /// at the first match. Worst case takes about `timeout * hosts.len()`.
    pub async fn find<S: AsRef<str>>(&self, hosts: &[S]) -> Result<String, FindError> {
        scan(
            &self.connector,
            self.timeout,
            hosts,
            self.observer.as_deref(),
        )
        .await
    }

    /// Probe a single host within one window
    pub async fn probe(&self, host: &str) -> ProbeOutcome {
        probe_host(&self.connector, self.timeout, host, self.observer.as_deref()).await
    }
}

/// One-shot lookup without building a [`MasterFinder`]
pub async fn find_master<C, S>(
    connector: &C,
    timeout: Duration,
    hosts: &[S],
) -> Result<String, FindError>
where
    C: Connector,
    S: AsRef<str>,
{
    scan(connector, timeout, hosts, None).await
}

async fn scan<C, S>(
    connector: &C,
    timeout: Duration,
    hosts: &[S],
    observer: Option<&dyn ProbeObserver>,
) -> Result<String, FindError>
where
    C: Connector,
    S: AsRef<str>,
{
    if hosts.is_empty() {
        return Err(FindError::NoHosts);
    }

    for host in hosts {
        let host = host.as_ref();
        if probe_host(connector, timeout, host, observer).await.is_master() {
            info!(host = %host, "Found writable master");
            return Ok(host.to_string());
        }
    }

    warn!(hosts = hosts.len(), "No writable master among candidate hosts");
    Err(FindError::NotFound)
}

async fn probe_host<C: Connector>(
    connector: &C,
    timeout: Duration,
    host: &str,
    observer: Option<&dyn ProbeObserver>,
) -> ProbeOutcome {
    let started = Instant::now();
    let deadline = started
        .checked_add(timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);
    let outcome = probe_until(connector, host, deadline).await;
    let elapsed = started.elapsed();

    debug!(
        host = %host,
        outcome = %outcome,
        elapsed = ?elapsed,
        "Probed host"
    );

    if let Some(observer) = observer {
        observer.observe(host, &outcome, elapsed);
    }
    outcome
}

/// Connect, check and release the host, all before `deadline`
///
/// An acquired connection is closed exactly once, whatever the check did.
/// When the deadline wins, the in-flight check future is dropped at its
/// current await point and its result is never looked at.
///
/// Close gets whatever is left of the window. It is always polled at least
/// once; if it is still pending at the deadline the handle is dropped.
async fn probe_until<C: Connector>(connector: &C, host: &str, deadline: Instant) -> ProbeOutcome {
    let mut conn = match timeout_at(deadline, connector.connect(host)).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(e)) => return ProbeOutcome::ConnectFailed(e.to_string()),
        Err(_) => return ProbeOutcome::TimedOut,
    };

    let outcome = timeout_at(deadline, check_role(&mut conn))
        .await
        .unwrap_or(ProbeOutcome::TimedOut);

    match timeout_at(deadline, conn.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(host = %host, error = %e, "Failed to close probe connection"),
        Err(_) => debug!(host = %host, "Close did not finish in window, dropping connection"),
    }
    outcome
}

/// Liveness round-trip, then role query
async fn check_role<T: Connection>(conn: &mut T) -> ProbeOutcome {
    if let Err(e) = conn.ping().await {
        return ProbeOutcome::PingFailed(e.to_string());
    }

    match conn.is_replica().await {
        Ok(false) => ProbeOutcome::Master,
        Ok(true) => ProbeOutcome::Replica,
        Err(e) => ProbeOutcome::QueryFailed(e.to_string()),
    }
}
