//! Scheduler cadence and shutdown tests

use async_trait::async_trait;
use loadbrake_application::{CollectorRegistry, PerformanceMonitor};
use loadbrake_domain::error::Result;
use loadbrake_domain::ports::{EngineControl, MetricCollector, ThresholdSource};
use loadbrake_domain::{ControllerState, CpuInfo, MetricKey, PerformanceMetric, Threshold};
use loadbrake_infrastructure::adapters::{InProcessEngine, RemoteThresholdClient};
use loadbrake_infrastructure::scheduler::MonitorScheduler;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INTERVAL: Duration = Duration::from_secs(30);

struct CountingCpu {
    usage: f64,
    calls: AtomicUsize,
}

#[async_trait]
impl MetricCollector for CountingCpu {
    fn key(&self) -> MetricKey {
        MetricKey::CpuUsage
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PerformanceMetric::CpuUsage(CpuInfo {
            cpu_usage_percentage: self.usage,
        }))
    }
}

struct FixedLimit(u8);

#[async_trait]
impl ThresholdSource for FixedLimit {
    async fn fetch_threshold(&self) -> Result<Threshold> {
        Threshold::new(self.0)
    }
}

fn monitor(
    engine: Arc<InProcessEngine>,
    usage: f64,
    limit: u8,
) -> (Arc<PerformanceMonitor>, Arc<CountingCpu>) {
    let cpu = Arc::new(CountingCpu {
        usage,
        calls: AtomicUsize::new(0),
    });
    let monitor = PerformanceMonitor::builder(engine as Arc<dyn EngineControl>)
        .registry(CollectorRegistry::new([MetricKey::CpuUsage]).with_collector(cpu.clone()))
        .threshold_source(Arc::new(FixedLimit(limit)))
        .build();
    (Arc::new(monitor), cpu)
}

#[tokio::test(start_paused = true)]
async fn test_runs_one_cycle_per_interval_until_cancelled() {
    let engine = Arc::new(InProcessEngine::new());
    let (monitor, cpu) = monitor(engine, 10.0, 50);
    let cancel = CancellationToken::new();

    let handle = MonitorScheduler::new(monitor.clone(), INTERVAL, cancel.clone()).spawn();

    // Ticks at 0s, 30s, 60s and 90s.
    tokio::time::sleep(Duration::from_secs(95)).await;
    cancel.cancel();
    let cycles = handle.await.unwrap();

    assert_eq!(cycles, 4);
    assert_eq!(cpu.calls.load(Ordering::SeqCst), 4);
    assert_eq!(monitor.cpu_usage(), 10);
    assert_eq!(monitor.threshold().value(), 50);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_runs_nothing() {
    let engine = Arc::new(InProcessEngine::new());
    let (monitor, cpu) = monitor(engine, 10.0, 50);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let cycles = MonitorScheduler::new(monitor, INTERVAL, cancel).run().await;

    assert_eq!(cycles, 0);
    assert_eq!(cpu.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_resumes_stopped_engine() {
    let engine = Arc::new(InProcessEngine::new());
    let (monitor, _cpu) = monitor(engine.clone(), 95.0, 50);
    let cancel = CancellationToken::new();

    let handle = MonitorScheduler::new(monitor.clone(), INTERVAL, cancel.clone()).spawn();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(monitor.state(), ControllerState::Stopped);
    assert!(!engine.is_running());

    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(monitor.state(), ControllerState::Running);
    assert!(engine.is_running());
    assert_eq!(engine.running_status(), ControllerState::Running);
}

#[tokio::test]
async fn test_shutdown_cuts_short_a_stalled_threshold_fetch() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let cancel = CancellationToken::new();
    let client = RemoteThresholdClient::new(&base_url, "t", "agent", reqwest::Client::new())
        .unwrap()
        .with_cancellation(cancel.clone());
    let cpu = Arc::new(CountingCpu {
        usage: 10.0,
        calls: AtomicUsize::new(0),
    });
    let monitor = Arc::new(
        PerformanceMonitor::builder(Arc::new(InProcessEngine::new()) as Arc<dyn EngineControl>)
            .registry(CollectorRegistry::new([MetricKey::CpuUsage]).with_collector(cpu.clone()))
            .threshold_source(Arc::new(client))
            .build(),
    );

    let handle = MonitorScheduler::new(monitor.clone(), INTERVAL, cancel.clone()).spawn();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(monitor.is_cycle_running());

    cancel.cancel();
    let cycles = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler must stop without waiting for the request")
        .unwrap();

    assert_eq!(cycles, 1);
    assert_eq!(monitor.threshold(), Threshold::DEFAULT);
    assert!(!monitor.is_cycle_running());
    server.abort();
}
