//! # Loadbrake Infrastructure
//!
//! Concrete adapters for the ports defined in `loadbrake-domain`, plus the
//! ambient services a deployment needs.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Figment-based configuration loading and validation |
//! | [`logging`] | Tracing subscriber setup |
//! | [`collectors`] | Default metric collectors (CPU, memory, threads, GC) |
//! | [`adapters`] | Remote threshold client, engine control, webhook extension |
//! | [`scheduler`] | Periodic cycle driver with cancellation |
//! | [`bootstrap`] | Wiring of a [`PerformanceMonitor`](loadbrake_application::PerformanceMonitor) from config |

pub mod adapters;
pub mod bootstrap;
pub mod collectors;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod scheduler;

pub use bootstrap::build_monitor;
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use scheduler::MonitorScheduler;
