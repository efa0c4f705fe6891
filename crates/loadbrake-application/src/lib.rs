//! Application Layer - loadbrake
//!
//! Implements one supervision cycle of the detection engine:
//!
//! ```text
//! CollectorRegistry ─► MetricsStore ─► BreakerDispatcher ─► ThresholdSynchronizer ─► CircuitController
//!       collect            publish          dispatch               refresh                 evaluate
//! ```
//!
//! [`PerformanceMonitor`] wires the five components and guarantees that
//! cycles never overlap. Every component degrades to "no progress this
//! cycle" instead of returning an error to the scheduler.
//!
//! ## Dependencies
//!
//! This crate depends only on `loadbrake-domain` and pure async libraries;
//! concrete collectors, HTTP and engine adapters come from
//! `loadbrake-infrastructure` or the host.

pub mod controller;
pub mod dispatcher;
pub mod monitor;
pub mod registry;
pub mod store;
pub mod threshold;

mod isolation;

pub use controller::{CircuitController, Decision, Evaluation, resume_limit};
pub use dispatcher::{BreakerDispatcher, DispatchOutcome};
pub use monitor::{
    CycleOutcome, CycleReport, PerformanceMonitor, PerformanceMonitorBuilder, PerformanceReport,
};
pub use registry::CollectorRegistry;
pub use store::{MetricsStore, PublishedMetrics};
pub use threshold::ThresholdSynchronizer;
