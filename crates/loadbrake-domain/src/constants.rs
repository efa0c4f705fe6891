//! Domain layer constants
//!
//! Values that are part of the throttling contract itself. Deployment
//! tunables (timeouts, intervals, file names) live in
//! `loadbrake_infrastructure::constants`.

/// Threshold used until a remote value has been retrieved (no throttling)
pub const THRESHOLD_DEFAULT_PERCENT: u8 = 100;

/// Upper bound of any percentage value (CPU usage, threshold)
pub const PERCENT_MAX: u8 = 100;

/// Numeric value of the `RUNNING` controller state
pub const CONTROLLER_STATE_RUNNING: u8 = 0;

/// Numeric value of the `STOPPED` controller state
pub const CONTROLLER_STATE_STOPPED: u8 = 1;
