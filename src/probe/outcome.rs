//! Per-host probe results

use std::fmt;
use std::time::Duration;

/// Result of probing a single host
///
/// Everything except [`ProbeOutcome::Master`] disqualifies the host; the
/// variants only exist for logging and observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Reachable, alive and not in recovery
    Master,
    /// Reachable but reports itself as a read-only replica
    Replica,
    /// The connector could not produce a connection
    ConnectFailed(String),
    /// Connected, but the liveness round-trip failed
    PingFailed(String),
    /// Alive, but the role query failed or returned garbage
    QueryFailed(String),
    /// The host's window expired before a verdict
    TimedOut,
}

impl ProbeOutcome {
    /// Whether this host qualifies as the writable primary
    pub fn is_master(&self) -> bool {
        matches!(self, Self::Master)
    }

    /// Short label, used as a metric label value
    pub fn label(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Replica => "replica",
            Self::ConnectFailed(_) => "connect_failed",
            Self::PingFailed(_) => "ping_failed",
            Self::QueryFailed(_) => "query_failed",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed(reason) | Self::PingFailed(reason) | Self::QueryFailed(reason) => {
                write!(f, "{}: {}", self.label(), reason)
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// Hook notified after every probed host
///
/// Runs inline on the scanning task, so implementations should be cheap.
pub trait ProbeObserver: Send + Sync {
    fn observe(&self, host: &str, outcome: &ProbeOutcome, elapsed: Duration);
}
