//! Default metric collectors
//!
//! | Key | Collector | Source |
//! |-----|-----------|--------|
//! | `CPU_USAGE` | [`CpuUsageCollector`] | `/proc/stat` tick counters |
//! | `MEM_USAGE` | [`MemoryUsageCollector`] | `sysinfo` resident memory |
//! | `MEM_NO_HEAP_USAGE` | [`NonHeapMemoryCollector`] | `sysinfo` virtual memory |
//! | `THREAD_INFO` | [`ThreadCountCollector`] | `sysinfo` process tasks |
//! | `GARBAGE_INFO` | [`GarbageInfoCollector`] | host-supplied [`GcStatsSource`] |

pub mod cpu;
pub mod garbage;
pub mod memory;
pub mod thread;

pub use cpu::{CpuTicks, CpuUsageCollector, ProcStatTickSource, TickSource, cpu_usage_percent};
pub use garbage::{GarbageInfoCollector, GcStatsSource};
pub use memory::{MemoryUsageCollector, NonHeapMemoryCollector, ProcessMemory, ProcessMemoryProbe};
pub use thread::ThreadCountCollector;

use crate::config::MonitorConfig;
use loadbrake_application::CollectorRegistry;
use loadbrake_domain::error::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Registration table for the configured metrics
///
/// Every default collector is registered; only `config.metrics` are
/// collected, in that order.
pub fn default_registry(
    config: &MonitorConfig,
    gc_source: Option<Arc<dyn GcStatsSource>>,
    cancel: CancellationToken,
) -> Result<CollectorRegistry> {
    let memory = Arc::new(ProcessMemoryProbe::current()?);

    Ok(CollectorRegistry::new(config.metrics.iter().copied())
        .with_timeout(config.collector_timeout())
        .with_collector(Arc::new(CpuUsageCollector::new(
            Arc::new(ProcStatTickSource::new()),
            config.cpu_sample_window(),
            cancel,
        )))
        .with_collector(Arc::new(MemoryUsageCollector::new(Arc::clone(&memory))))
        .with_collector(Arc::new(NonHeapMemoryCollector::new(memory)))
        .with_collector(Arc::new(GarbageInfoCollector::new(gc_source)))
        .with_collector(Arc::new(ThreadCountCollector::current()?)))
}
