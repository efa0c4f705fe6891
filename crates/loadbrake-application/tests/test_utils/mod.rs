//! Test doubles for the breaker ports

#![allow(dead_code)]

use async_trait::async_trait;
use loadbrake_domain::ports::{BreakerExtension, EngineControl, MetricCollector, ThresholdSource};
use loadbrake_domain::{
    ControllerState, CpuInfo, Error, GarbageInfo, MemoryUsage, MetricKey, PerformanceMetric,
    Result, ThreadInfo, Threshold,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Engine that records calls and can be told to fail
#[derive(Default)]
pub struct RecordingEngine {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub fail_actions: AtomicBool,
    status: Mutex<ControllerState>,
}

impl RecordingEngine {
    pub fn failing() -> Self {
        let engine = Self::default();
        engine.fail_actions.store(true, Ordering::SeqCst);
        engine
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineControl for RecordingEngine {
    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(Error::control_action(ControllerState::Running, "start refused"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(Error::control_action(ControllerState::Stopped, "stop refused"));
        }
        Ok(())
    }

    fn running_status(&self) -> ControllerState {
        *self.status.lock().unwrap()
    }

    fn set_running_status(&self, state: ControllerState) {
        *self.status.lock().unwrap() = state;
    }
}

/// Default measurement for a key
pub fn sample_metric(key: MetricKey) -> PerformanceMetric {
    match key {
        MetricKey::CpuUsage => cpu_metric(10.0),
        MetricKey::MemUsage => PerformanceMetric::MemUsage(MemoryUsage {
            used: 64,
            committed: 128,
            max: 256,
        }),
        MetricKey::MemNoHeapUsage => PerformanceMetric::MemNoHeapUsage(MemoryUsage::default()),
        MetricKey::GarbageInfo => PerformanceMetric::GarbageInfo(GarbageInfo::default()),
        MetricKey::ThreadInfo => PerformanceMetric::ThreadInfo(ThreadInfo {
            thread_count: 8,
            peak_thread_count: 8,
        }),
    }
}

pub fn cpu_metric(percent: f64) -> PerformanceMetric {
    PerformanceMetric::CpuUsage(CpuInfo {
        cpu_usage_percentage: percent,
    })
}

/// Collector returning a fixed measurement
pub struct StaticCollector {
    key: MetricKey,
    metric: PerformanceMetric,
}

impl StaticCollector {
    pub fn new(key: MetricKey) -> Self {
        Self {
            key,
            metric: sample_metric(key),
        }
    }

    /// Registered under `key` but returns `metric` regardless
    pub fn mismatched(key: MetricKey, metric: PerformanceMetric) -> Self {
        Self { key, metric }
    }
}

#[async_trait]
impl MetricCollector for StaticCollector {
    fn key(&self) -> MetricKey {
        self.key
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        Ok(self.metric.clone())
    }
}

/// Collector that always errors
pub struct FailingCollector(pub MetricKey);

#[async_trait]
impl MetricCollector for FailingCollector {
    fn key(&self) -> MetricKey {
        self.0
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        Err(Error::collector(self.0, "source unavailable"))
    }
}

/// Collector that panics
pub struct PanickingCollector(pub MetricKey);

#[async_trait]
impl MetricCollector for PanickingCollector {
    fn key(&self) -> MetricKey {
        self.0
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        panic!("collector exploded")
    }
}

/// Collector that sleeps before answering
pub struct SlowCollector {
    pub key: MetricKey,
    pub delay: Duration,
}

#[async_trait]
impl MetricCollector for SlowCollector {
    fn key(&self) -> MetricKey {
        self.key
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        tokio::time::sleep(self.delay).await;
        Ok(sample_metric(self.key))
    }
}

/// CPU collector replaying a script of usage values
pub struct ScriptedCpuCollector {
    readings: Mutex<VecDeque<f64>>,
}

impl ScriptedCpuCollector {
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
        }
    }
}

#[async_trait]
impl MetricCollector for ScriptedCpuCollector {
    fn key(&self) -> MetricKey {
        MetricKey::CpuUsage
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let next = self.readings.lock().unwrap().pop_front();
        next.map(cpu_metric)
            .ok_or_else(|| Error::collector(MetricKey::CpuUsage, "script exhausted"))
    }
}

/// Threshold source replaying scripted responses; `None` entries fail
pub struct ScriptedThresholdSource {
    responses: Mutex<VecDeque<Option<u8>>>,
    pub calls: AtomicUsize,
}

impl ScriptedThresholdSource {
    pub fn new(responses: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ThresholdSource for ScriptedThresholdSource {
    async fn fetch_threshold(&self) -> Result<Threshold> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().pop_front().flatten() {
            Some(value) => Threshold::new(value),
            None => Err(Error::threshold_fetch("connection refused")),
        }
    }
}

/// Extension that records payloads and optionally fails
#[derive(Default)]
pub struct RecordingExtension {
    pub payloads: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingExtension {
    pub fn failing() -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl BreakerExtension for RecordingExtension {
    fn name(&self) -> &str {
        "recording"
    }

    async fn check_performance(&self, serialized_metrics: &str) -> Result<()> {
        self.payloads
            .lock()
            .unwrap()
            .push(serialized_metrics.to_string());
        if self.fail {
            return Err(Error::extension_dispatch("recording", "policy rejected"));
        }
        Ok(())
    }
}

/// Extension that panics
pub struct PanickingExtension;

#[async_trait]
impl BreakerExtension for PanickingExtension {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn check_performance(&self, _serialized_metrics: &str) -> Result<()> {
        panic!("extension exploded")
    }
}

/// Engine whose control actions panic
#[derive(Default)]
pub struct PanickingEngine {
    pub stops: AtomicUsize,
    status: Mutex<ControllerState>,
}

#[async_trait]
impl EngineControl for PanickingEngine {
    async fn start(&self) -> Result<()> {
        panic!("engine start exploded")
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        panic!("engine stop exploded")
    }

    fn running_status(&self) -> ControllerState {
        *self.status.lock().unwrap()
    }

    fn set_running_status(&self, state: ControllerState) {
        *self.status.lock().unwrap() = state;
    }
}

/// Threshold source that answers once, then panics
pub struct PanickingThresholdSource {
    first: Mutex<Option<u8>>,
}

impl PanickingThresholdSource {
    pub fn after(first: u8) -> Self {
        Self {
            first: Mutex::new(Some(first)),
        }
    }
}

#[async_trait]
impl ThresholdSource for PanickingThresholdSource {
    async fn fetch_threshold(&self) -> Result<Threshold> {
        let first = self.first.lock().unwrap().take();
        match first {
            Some(value) => Threshold::new(value),
            None => panic!("threshold source exploded"),
        }
    }
}
