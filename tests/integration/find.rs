//! Master lookup against a live PostgreSQL server

use std::time::{Duration, Instant};

use pgmaster::{find_master, Connection, Connector, FindError, MasterFinder, ProbeOutcome};

use crate::{connector, primary_host, replica_host, skip_if_not_enabled};

/// Routable but unused address: connect hangs until the window expires
const BLACKHOLE: &str = "123.45.67.89";

#[tokio::test]
async fn test_primary_reports_not_replica() {
    skip_if_not_enabled!();

    let mut conn = connector().connect(&primary_host()).await.unwrap();
    conn.ping().await.unwrap();
    assert!(!conn.is_replica().await.unwrap());
    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_skips_unreachable_host() {
    skip_if_not_enabled!();

    let host = primary_host();
    let timeout = Duration::from_secs(5);
    let started = Instant::now();

    let master = find_master(&connector(), timeout, &[BLACKHOLE, host.as_str()])
        .await
        .unwrap();

    assert_eq!(master, host);
    assert!(started.elapsed() < timeout * 2 + Duration::from_secs(1));
}

#[tokio::test]
async fn test_refused_port_is_connect_failure() {
    skip_if_not_enabled!();

    let finder = MasterFinder::new(connector(), Duration::from_secs(5));

    // Nothing listens on port 1
    let outcome = finder.probe("127.0.0.1:1").await;
    assert!(matches!(outcome, ProbeOutcome::ConnectFailed(_)));
}

#[tokio::test]
async fn test_unreachable_only_not_found() {
    skip_if_not_enabled!();

    let timeout = Duration::from_secs(1);
    let started = Instant::now();

    let result = find_master(&connector(), timeout, &[BLACKHOLE]).await;

    assert_eq!(result, Err(FindError::NotFound));
    assert!(started.elapsed() < timeout + Duration::from_millis(500));
}

#[tokio::test]
async fn test_replica_is_skipped() {
    skip_if_not_enabled!();

    let Some(replica) = replica_host() else {
        eprintln!("Skipping replica test (set PGMASTER_TEST_REPLICA)");
        return;
    };
    let primary = primary_host();
    let finder = MasterFinder::new(connector(), Duration::from_secs(5));

    assert_eq!(finder.probe(&replica).await, ProbeOutcome::Replica);
    assert_eq!(
        finder.find(&[replica.as_str(), primary.as_str()]).await.unwrap(),
        primary
    );
    assert_eq!(
        finder.find(&[replica.as_str()]).await,
        Err(FindError::NotFound)
    );
}
