//! Infrastructure layer constants
//!
//! Deployment defaults and wire-level constants. Domain constants live in
//! `loadbrake_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "loadbrake.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "loadbrake";

/// Environment variable prefix for configuration (`LOADBRAKE__SERVER__TOKEN`)
pub const CONFIG_ENV_PREFIX: &str = "LOADBRAKE";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// REMOTE CONTROL SERVICE CONSTANTS
// ============================================================================

/// Default control service base URL
pub const DEFAULT_SERVER_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the throttling limit endpoint
pub const LIMIT_ENDPOINT_PATH: &str = "/api/v1/agent/limit";

/// Query parameter carrying the agent identity
pub const AGENT_NAME_QUERY_PARAM: &str = "agentName";

/// Scheme prefix of the `Authorization` header value
pub const AUTHORIZATION_TOKEN_PREFIX: &str = "Token ";

/// Content type sent with control service requests
pub const CONTENT_TYPE_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Agent name used when the hostname cannot be determined
pub const DEFAULT_AGENT_NAME: &str = "loadbrake";

/// Connect timeout for control service requests (milliseconds)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Read timeout for control service requests (milliseconds)
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// MONITOR CONSTANTS
// ============================================================================

/// Interval between supervision cycles (seconds)
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 30;

/// CPU sampling window (milliseconds)
pub const DEFAULT_CPU_SAMPLE_WINDOW_MS: u64 = 1000;

/// Upper bound for a single collector call (milliseconds)
pub const DEFAULT_COLLECTOR_TIMEOUT_MS: u64 = 10_000;

/// Timeout for breaker extension calls (milliseconds)
pub const DEFAULT_EXTENSION_TIMEOUT_MS: u64 = 2000;

/// Aggregated CPU tick counters
pub const PROC_STAT_PATH: &str = "/proc/stat";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "LOADBRAKE_LOG";

/// File name prefix for rolling log files
pub const LOG_FILE_PREFIX: &str = "loadbrake";
