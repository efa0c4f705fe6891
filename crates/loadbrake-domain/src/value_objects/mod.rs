//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`MetricKey`] | Identifier of a collectable metric |
//! | [`PerformanceMetric`] | Measurement tagged with its key |
//! | [`MetricsSnapshot`] | Measurements from one cycle |
//! | [`Threshold`] | CPU percentage at which the controller acts |
//! | [`ControllerState`] | `RUNNING` / `STOPPED` |

/// Controller state and threshold
pub mod control;
/// Metric keys and tagged measurements
pub mod metric;
/// Per-cycle measurement snapshot
pub mod snapshot;

pub use control::{ControllerState, Threshold};
pub use metric::{
    CpuInfo, GarbageCollectorInfo, GarbageInfo, MemoryUsage, MetricKey, PerformanceMetric,
    ThreadInfo,
};
pub use snapshot::MetricsSnapshot;
