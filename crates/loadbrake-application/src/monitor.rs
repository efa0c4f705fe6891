//! Performance Monitor
//!
//! Orchestrates one supervision cycle:
//! collect → publish → dispatch → refresh threshold → evaluate.
//!
//! Cycles are single-flight: a call to [`PerformanceMonitor::run_cycle`]
//! made while another is in progress returns [`CycleOutcome::Skipped`]
//! immediately. The read accessors are non-blocking and safe to call from
//! reporting tasks at any time.

use crate::controller::{CircuitController, Evaluation};
use crate::dispatcher::{BreakerDispatcher, DispatchOutcome};
use crate::registry::CollectorRegistry;
use crate::store::MetricsStore;
use crate::threshold::ThresholdSynchronizer;
use loadbrake_domain::ports::{BreakerExtension, EngineControl, ThresholdSource};
use loadbrake_domain::{ControllerState, MetricKey, MetricsSnapshot, PerformanceMetric, Threshold};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Summary of a completed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Keys collected successfully this cycle
    pub collected: Vec<MetricKey>,
    /// CPU usage the controller evaluated
    pub cpu_usage: u8,
    /// Threshold the controller evaluated against
    pub threshold: Threshold,
    /// Extension dispatch result
    pub dispatch: DispatchOutcome,
    /// Controller result
    pub evaluation: Evaluation,
}

/// Result of a [`PerformanceMonitor::run_cycle`] call
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The cycle ran to completion
    Completed(CycleReport),
    /// Another cycle was already in progress
    Skipped,
}

/// Serializable view for periodic telemetry upload
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    /// Latest CPU usage percentage
    pub cpu_usage: u8,
    /// Threshold currently in effect
    pub threshold: Threshold,
    /// Controller state
    pub state: ControllerState,
    /// Latest measurements
    pub metrics: Vec<PerformanceMetric>,
}

/// Clears the in-flight flag when a cycle ends, including on cancellation
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Load-aware supervisor of the detection engine
pub struct PerformanceMonitor {
    registry: CollectorRegistry,
    store: MetricsStore,
    dispatcher: BreakerDispatcher,
    synchronizer: ThresholdSynchronizer,
    controller: CircuitController,
    in_flight: AtomicBool,
}

impl PerformanceMonitor {
    /// Start building a monitor around `engine`
    pub fn builder(engine: Arc<dyn EngineControl>) -> PerformanceMonitorBuilder {
        PerformanceMonitorBuilder::new(engine)
    }

    /// Run one full cycle unless another one is in progress
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Previous cycle still running, skipping");
            return CycleOutcome::Skipped;
        };

        let snapshot = self.registry.collect().await;
        let collected = snapshot.keys();
        let snapshot = self.store.publish(snapshot);
        let dispatch = self.dispatcher.dispatch(&snapshot).await;
        let threshold = self.synchronizer.refresh().await;
        let cpu_usage = self.store.current_cpu_usage();
        let evaluation = self.controller.evaluate(cpu_usage, threshold).await;

        debug!(
            collected = collected.len(),
            cpu_usage = cpu_usage,
            threshold = threshold.value(),
            state = %self.controller.state(),
            "Cycle completed"
        );

        CycleOutcome::Completed(CycleReport {
            collected,
            cpu_usage,
            threshold,
            dispatch,
            evaluation,
        })
    }

    /// Whether a cycle is currently executing
    pub fn is_cycle_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Latest CPU usage percentage
    pub fn cpu_usage(&self) -> u8 {
        self.store.current_cpu_usage()
    }

    /// Latest published snapshot
    pub fn performance_metrics(&self) -> Arc<MetricsSnapshot> {
        self.store.current_snapshot()
    }

    /// Threshold currently in effect
    pub fn threshold(&self) -> Threshold {
        self.synchronizer.current()
    }

    /// Current controller state
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Resume a stopped engine, e.g. before the monitor is dropped
    pub async fn resume_engine(&self) -> Evaluation {
        self.controller.release().await
    }

    /// Snapshot of everything the reporting path uploads
    pub fn report(&self) -> PerformanceReport {
        let published = self.store.current();
        PerformanceReport {
            cpu_usage: published.cpu_usage,
            threshold: self.threshold(),
            state: self.state(),
            metrics: published.snapshot.metrics().to_vec(),
        }
    }
}

/// Builder for [`PerformanceMonitor`]
pub struct PerformanceMonitorBuilder {
    engine: Arc<dyn EngineControl>,
    registry: Option<CollectorRegistry>,
    threshold_source: Option<Arc<dyn ThresholdSource>>,
    extension: Option<Arc<dyn BreakerExtension>>,
    resume_threshold: Option<Threshold>,
}

impl PerformanceMonitorBuilder {
    fn new(engine: Arc<dyn EngineControl>) -> Self {
        Self {
            engine,
            registry: None,
            threshold_source: None,
            extension: None,
            resume_threshold: None,
        }
    }

    /// Set the collector registry (default: collects nothing)
    pub fn registry(mut self, registry: CollectorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the remote threshold source (default: fixed at 100%)
    pub fn threshold_source(mut self, source: Arc<dyn ThresholdSource>) -> Self {
        self.threshold_source = Some(source);
        self
    }

    /// Set the optional breaker extension
    pub fn extension(mut self, extension: Option<Arc<dyn BreakerExtension>>) -> Self {
        self.extension = extension;
        self
    }

    /// Use a separate threshold for resuming the engine
    pub fn resume_threshold(mut self, resume_threshold: Option<Threshold>) -> Self {
        self.resume_threshold = resume_threshold;
        self
    }

    /// Assemble the monitor with its initial state
    pub fn build(self) -> PerformanceMonitor {
        let synchronizer = match self.threshold_source {
            Some(source) => ThresholdSynchronizer::new(source),
            None => ThresholdSynchronizer::fixed(Threshold::DEFAULT),
        };

        PerformanceMonitor {
            registry: self
                .registry
                .unwrap_or_else(|| CollectorRegistry::new(Vec::new())),
            store: MetricsStore::new(),
            dispatcher: BreakerDispatcher::new(self.extension),
            synchronizer,
            controller: CircuitController::new(self.engine)
                .with_resume_threshold(self.resume_threshold),
            in_flight: AtomicBool::new(false),
        }
    }
}
