use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Probe settings (timeout and candidate hosts)
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Connection parameters shared by every probed host
    #[serde(default)]
    pub postgres: PostgresConfig,
}

// ============================================================================
// Probe Configuration
// ============================================================================

/// Settings for a single master lookup
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Per-host window for connect + ping + role query (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Candidate hosts in priority order
    #[serde(default)]
    pub hosts: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            hosts: Vec::new(),
        }
    }
}

impl ProbeConfig {
    /// Per-host timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ============================================================================
// PostgreSQL Configuration
// ============================================================================

/// Connection parameters applied to every host
///
/// The host itself comes from the probe list; a `host:port` entry there
/// overrides `port`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    /// Empty means "let libpq-style sources decide" (PGPASSWORD, .pgpass)
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub ssl_mode: SslMode,
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_application_name() -> String {
    "pgmaster".to_string()
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            ssl_mode: SslMode::default(),
            application_name: default_application_name(),
        }
    }
}

/// TLS negotiation mode, same names as libpq's `sslmode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}
