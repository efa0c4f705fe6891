//! # Domain Layer
//!
//! Core types and contracts of the load-aware engine breaker.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | Metric keys, tagged metrics, snapshots, threshold and controller state |
//! | [`ports`] | Contracts implemented by collectors, engines, extensions and threshold sources |
//! | [`error`] | Domain error type shared by every layer |
//! | [`constants`] | Domain constants |
//!
//! This crate has no knowledge of the operating system, HTTP or the async
//! runtime; those live in `loadbrake-infrastructure`.

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{
    ControllerState, CpuInfo, GarbageCollectorInfo, GarbageInfo, MemoryUsage, MetricKey,
    MetricsSnapshot, PerformanceMetric, ThreadInfo, Threshold,
};
