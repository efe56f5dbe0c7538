//! Integration test entry point
//!
//! Run with: PGMASTER_RUN_INTEGRATION_TESTS=1 cargo test --test integration
//!
//! Environment variables:
//! - PGMASTER_RUN_INTEGRATION_TESTS: Set to "1" to enable integration tests
//! - PGMASTER_TEST_HOST: Writable primary host (default: 127.0.0.1)
//! - PGMASTER_TEST_PORT: Primary port (default: 5432)
//! - PGMASTER_TEST_USER: User (default: postgres)
//! - PGMASTER_TEST_PASS: Password (default: password)
//! - PGMASTER_TEST_DB: Database (default: postgres)
//! - PGMASTER_TEST_REPLICA: Optional replica host[:port], enables replica tests

mod find;

use std::env;

use pgmaster::config::{PostgresConfig, SslMode};
use pgmaster::PgConnector;

/// Check if integration tests should run
pub fn should_run_integration_tests() -> bool {
    env::var("PGMASTER_RUN_INTEGRATION_TESTS")
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Skip test if integration tests are not enabled
#[macro_export]
macro_rules! skip_if_not_enabled {
    () => {
        if !crate::should_run_integration_tests() {
            eprintln!("Skipping integration test (set PGMASTER_RUN_INTEGRATION_TESTS=1 to run)");
            return;
        }
    };
}

/// Primary host from environment
pub fn primary_host() -> String {
    env::var("PGMASTER_TEST_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Replica host from environment, if one is available
pub fn replica_host() -> Option<String> {
    env::var("PGMASTER_TEST_REPLICA").ok().filter(|h| !h.is_empty())
}

/// Connection settings from environment
pub fn postgres_config() -> PostgresConfig {
    PostgresConfig {
        port: env::var("PGMASTER_TEST_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        user: env::var("PGMASTER_TEST_USER").unwrap_or_else(|_| "postgres".to_string()),
        password: env::var("PGMASTER_TEST_PASS").unwrap_or_else(|_| "password".to_string()),
        database: env::var("PGMASTER_TEST_DB").unwrap_or_else(|_| "postgres".to_string()),
        ssl_mode: SslMode::Disable,
        ..PostgresConfig::default()
    }
}

/// Connector for the test server
pub fn connector() -> PgConnector {
    PgConnector::from_config(&postgres_config())
}
