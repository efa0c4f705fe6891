//! Live thread count of a process
//!
//! Reads the task list `sysinfo` keeps for the process. Platforms where
//! `sysinfo` does not enumerate tasks fail collection, so the key is omitted.

use async_trait::async_trait;
use loadbrake_domain::error::{Error, Result};
use loadbrake_domain::ports::MetricCollector;
use loadbrake_domain::{MetricKey, PerformanceMetric, ThreadInfo};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// `THREAD_INFO` collector
pub struct ThreadCountCollector {
    system: Arc<Mutex<System>>,
    pid: Pid,
    peak: AtomicU32,
}

impl ThreadCountCollector {
    /// Collector for the current process
    pub fn current() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| Error::internal(format!("Cannot determine current pid: {e}")))?;
        Ok(Self::for_pid(pid.as_u32()))
    }

    /// Collector for process `pid`
    pub fn for_pid(pid: u32) -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            pid: Pid::from_u32(pid),
            peak: AtomicU32::new(0),
        }
    }

    /// Peak thread count seen so far
    pub fn peak(&self) -> u32 {
        self.peak.load(Ordering::Acquire)
    }
}

fn count_threads(system: &Mutex<System>, pid: Pid) -> Result<u32> {
    let mut system = system
        .lock()
        .map_err(|_| Error::collector(MetricKey::ThreadInfo, "thread sampler lock poisoned"))?;

    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_tasks(),
    );

    let process = system
        .process(pid)
        .ok_or_else(|| Error::collector(MetricKey::ThreadInfo, format!("process {pid} not found")))?;
    let tasks = process.tasks().ok_or_else(|| {
        Error::collector(MetricKey::ThreadInfo, "thread enumeration is not supported here")
    })?;

    // The main thread is listed on some platforms only.
    let count = tasks.len() + usize::from(!tasks.contains(&pid));
    u32::try_from(count)
        .map_err(|_| Error::collector(MetricKey::ThreadInfo, "thread count out of range"))
}

#[async_trait]
impl MetricCollector for ThreadCountCollector {
    fn key(&self) -> MetricKey {
        MetricKey::ThreadInfo
    }

    async fn collect(&self) -> Result<PerformanceMetric> {
        let system = Arc::clone(&self.system);
        let pid = self.pid;
        let thread_count = tokio::task::spawn_blocking(move || count_threads(&system, pid))
            .await
            .map_err(|e| {
                Error::collector(MetricKey::ThreadInfo, format!("thread sampling task failed: {e}"))
            })??;

        let previous_peak = self.peak.fetch_max(thread_count, Ordering::AcqRel);
        Ok(PerformanceMetric::ThreadInfo(ThreadInfo {
            thread_count,
            peak_thread_count: previous_peak.max(thread_count),
        }))
    }
}
