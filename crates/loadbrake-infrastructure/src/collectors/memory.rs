//! Process memory collectors backed by `sysinfo`
//!
//! Refreshes block on procfs reads, so collectors sample on the blocking pool.

use async_trait::async_trait;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{MemoryUsage, MetricKey, PerformanceMetric};
use std::sync::{Arc, Mutex};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// One memory reading of the host process, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessMemory {
    /// Resident set size
    pub resident: u64,
    /// Virtual address space size
    pub virtual_memory: u64,
    /// Physical memory of the machine
    pub total_system: u64,
}

impl ProcessMemory {
    /// `MEM_USAGE` view: resident memory against total system memory
    pub fn usage(&self) -> MemoryUsage {
        MemoryUsage {
            used: self.resident,
            committed: self.resident,
            max: self.total_system,
        }
    }

    /// `MEM_NO_HEAP_USAGE` view: mapped but non-resident memory, unbounded
    pub fn non_heap_usage(&self) -> MemoryUsage {
        MemoryUsage {
            used: self.virtual_memory.saturating_sub(self.resident),
            committed: self.virtual_memory,
            max: 0,
        }
    }
}

/// Reads memory figures for the current process
pub struct ProcessMemoryProbe {
    system: Mutex<System>,
    pid: Pid,
}

impl ProcessMemoryProbe {
    /// Probe for the running process
    pub fn current() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| Error::internal(format!("Cannot determine current pid: {e}")))?;
        Ok(Self {
            system: Mutex::new(System::new()),
            pid,
        })
    }

    /// Refresh and read the process and system memory figures
    pub fn sample(&self) -> Result<ProcessMemory> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| Error::internal("Memory probe lock poisoned"))?;

        system.refresh_memory();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let process = system
            .process(self.pid)
            .ok_or_else(|| Error::internal(format!("Process {} not found", self.pid)))?;

        Ok(ProcessMemory {
            resident: process.memory(),
            virtual_memory: process.virtual_memory(),
            total_system: system.total_memory(),
        })
    }

    /// [`Self::sample`] on the blocking pool
    pub async fn sample_blocking(self: &Arc<Self>) -> Result<ProcessMemory> {
        let probe = Arc::clone(self);
        tokio::task::spawn_blocking(move || probe.sample())
            .await
            .map_err(|e| Error::internal(format!("Memory sampling task failed: {e}")))?
    }
}

/// `MEM_USAGE` collector
pub struct MemoryUsageCollector {
    probe: Arc<ProcessMemoryProbe>,
}

impl MemoryUsageCollector {
    pub fn new(probe: Arc<ProcessMemoryProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl MetricCollector for MemoryUsageCollector {
    fn key(&self) -> MetricKey {
        MetricKey::MemUsage
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let sample = self
            .probe
            .sample_blocking()
            .await
            .map_err(|e| Error::collector(MetricKey::MemUsage, e.to_string()))?;
        Ok(PerformanceMetric::MemUsage(sample.usage()))
    }
}

/// `MEM_NO_HEAP_USAGE` collector
pub struct NonHeapMemoryCollector {
    probe: Arc<ProcessMemoryProbe>,
}

impl NonHeapMemoryCollector {
    pub fn new(probe: Arc<ProcessMemoryProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl MetricCollector for NonHeapMemoryCollector {
    fn key(&self) -> MetricKey {
        MetricKey::MemNoHeapUsage
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let sample = self
            .probe
            .sample_blocking()
            .await
            .map_err(|e| Error::collector(MetricKey::MemNoHeapUsage, e.to_string()))?;
        Ok(PerformanceMetric::MemNoHeapUsage(sample.non_heap_usage()))
    }
}
