//! Master lookup
//!
//! Scans an ordered host list one host at a time and returns the first host
//! that answers as a writable primary. Each host gets a fixed time window
//! covering connect, ping and role query; anything that fails or runs out
//! of time inside that window simply disqualifies the host.
//!
//! Only two errors reach the caller: [`FindError::NoHosts`] and
//! [`FindError::NotFound`]. Per-host reasons are available through a
//! [`ProbeObserver`].

mod finder;
mod outcome;

pub use finder::{find_master, FindError, MasterFinder};
pub use outcome::{ProbeObserver, ProbeOutcome};
