//! Memory, thread and garbage collector tests

use async_trait::async_trait;
use loadbrake_domain::error::Result;
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{GarbageCollectorInfo, MetricKey};
use loadbrake_infrastructure::collectors::{
    GarbageInfoCollector, GcStatsSource, MemoryUsageCollector, NonHeapMemoryCollector,
    ProcessMemory, ProcessMemoryProbe, ThreadCountCollector, default_registry,
};
use loadbrake_infrastructure::config::MonitorConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const MIB: u64 = 1024 * 1024;

#[test]
fn test_process_memory_views() {
    let sample = ProcessMemory {
        resident: 100 * MIB,
        virtual_memory: 400 * MIB,
        total_system: 1000 * MIB,
    };

    let heap = sample.usage();
    assert_eq!(heap.used, 100 * MIB);
    assert_eq!(heap.max, 1000 * MIB);
    assert!((heap.used_rate() - 0.1).abs() < f64::EPSILON);

    let non_heap = sample.non_heap_usage();
    assert_eq!(non_heap.used, 300 * MIB);
    assert_eq!(non_heap.committed, 400 * MIB);
    assert_eq!(non_heap.max, 0);
    assert_eq!(non_heap.used_rate(), 0.0);
}

#[test]
fn test_non_heap_usage_never_underflows() {
    let sample = ProcessMemory {
        resident: 10,
        virtual_memory: 5,
        total_system: 100,
    };
    assert_eq!(sample.non_heap_usage().used, 0);
}

#[tokio::test]
async fn test_memory_collectors_read_current_process() {
    let probe = Arc::new(ProcessMemoryProbe::current().unwrap());

    let heap = MemoryUsageCollector::new(probe.clone()).collect().await.unwrap();
    assert_eq!(heap.key(), MetricKey::MemUsage);
    let usage = heap.as_memory().unwrap();
    assert!(usage.used > 0);
    assert!(usage.max >= usage.used);

    let non_heap = NonHeapMemoryCollector::new(probe).collect().await.unwrap();
    assert_eq!(non_heap.key(), MetricKey::MemNoHeapUsage);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_thread_count_of_current_process() {
    let collector = ThreadCountCollector::current().unwrap();
    let metric = collector.collect().await.unwrap();
    let info = metric.as_thread().unwrap();
    assert!(info.thread_count >= 1);
    assert_eq!(info.peak_thread_count, info.thread_count);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_thread_peak_survives_threads_exiting() {
    let collector = ThreadCountCollector::current().unwrap();
    let (release, parked) = std::sync::mpsc::channel::<()>();
    let parked = Arc::new(std::sync::Mutex::new(parked));
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let parked = Arc::clone(&parked);
            std::thread::spawn(move || {
                let _ = parked.lock().unwrap().recv();
            })
        })
        .collect();

    let busy = collector.collect().await.unwrap();
    let busy = busy.as_thread().unwrap();
    assert!(busy.thread_count > 4);

    drop(release);
    for worker in workers {
        worker.join().unwrap();
    }

    let after = collector.collect().await.unwrap();
    let after = after.as_thread().unwrap();
    assert!(after.peak_thread_count >= busy.thread_count);
    assert!(after.peak_thread_count >= after.thread_count);
    assert_eq!(collector.peak(), after.peak_thread_count);
}

#[tokio::test]
async fn test_thread_count_of_missing_process_fails() {
    let collector = ThreadCountCollector::for_pid(u32::MAX - 1);
    assert!(collector.collect().await.is_err());
}

struct FixedGcStats;

#[async_trait]
impl GcStatsSource for FixedGcStats {
    async fn gc_stats(&self) -> Result<Vec<GarbageCollectorInfo>> {
        Ok(vec![GarbageCollectorInfo {
            name: "young".to_string(),
            collection_count: 12,
            collection_time_ms: 340,
        }])
    }
}

#[tokio::test]
async fn test_garbage_collector_without_source_reports_empty_list() {
    let metric = GarbageInfoCollector::default().collect().await.unwrap();
    assert_eq!(metric.key(), MetricKey::GarbageInfo);
    assert!(metric.as_garbage().unwrap().collectors.is_empty());
}

#[tokio::test]
async fn test_garbage_collector_forwards_host_stats() {
    let collector = GarbageInfoCollector::new(Some(Arc::new(FixedGcStats)));
    let metric = collector.collect().await.unwrap();
    let collectors = &metric.as_garbage().unwrap().collectors;
    assert_eq!(collectors.len(), 1);
    assert_eq!(collectors[0].collection_count, 12);
}

#[test]
fn test_default_registry_covers_every_key() {
    let config = MonitorConfig {
        metrics: vec![MetricKey::ThreadInfo, MetricKey::CpuUsage],
        ..MonitorConfig::default()
    };
    let registry = default_registry(&config, None, CancellationToken::new()).unwrap();

    assert_eq!(
        registry.configured_keys(),
        &[MetricKey::ThreadInfo, MetricKey::CpuUsage]
    );
    for key in MetricKey::ALL {
        assert!(registry.is_registered(key), "{key} not registered");
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_default_registry_collects_configured_metrics() {
    let config = MonitorConfig {
        metrics: vec![MetricKey::MemUsage, MetricKey::GarbageInfo, MetricKey::ThreadInfo],
        ..MonitorConfig::default()
    };
    let registry = default_registry(&config, None, CancellationToken::new()).unwrap();

    let snapshot = registry.collect().await;
    assert_eq!(
        snapshot.keys(),
        vec![MetricKey::MemUsage, MetricKey::GarbageInfo, MetricKey::ThreadInfo]
    );
}
