//! Performance metric value objects
//!
//! A [`PerformanceMetric`] is a tagged value: the variant *is* the metric key,
//! so a CPU measurement can never carry a garbage-collection payload. On the
//! wire it serializes as `{"key": "CPU_USAGE", "value": {...}}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a collectable metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKey {
    /// System-wide CPU usage percentage
    CpuUsage,
    /// Host process memory usage
    MemUsage,
    /// Host process memory outside the managed heap
    MemNoHeapUsage,
    /// Garbage collector counters of the host runtime
    GarbageInfo,
    /// Host process thread counters
    ThreadInfo,
}

impl MetricKey {
    /// Every key, in default collection order
    pub const ALL: [MetricKey; 5] = [
        MetricKey::CpuUsage,
        MetricKey::MemUsage,
        MetricKey::MemNoHeapUsage,
        MetricKey::GarbageInfo,
        MetricKey::ThreadInfo,
    ];

    /// Wire name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CpuUsage => "CPU_USAGE",
            Self::MemUsage => "MEM_USAGE",
            Self::MemNoHeapUsage => "MEM_NO_HEAP_USAGE",
            Self::GarbageInfo => "GARBAGE_INFO",
            Self::ThreadInfo => "THREAD_INFO",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_argument(format!("Unknown metric key: {s}")))
    }
}

/// CPU measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Usage percentage in `[0, 100]`
    pub cpu_usage_percentage: f64,
}

impl CpuInfo {
    /// Usage truncated to a whole percentage and clamped to `[0, 100]`
    pub fn usage_percent(&self) -> u8 {
        // Truncation is intentional: 79.9% is still below an 80% threshold.
        self.cpu_usage_percentage.clamp(0.0, 100.0) as u8
    }
}

/// Memory measurement in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Bytes currently in use
    pub used: u64,
    /// Bytes reserved from the operating system
    pub committed: u64,
    /// Upper bound the usage may grow to (0 when unknown)
    pub max: u64,
}

impl MemoryUsage {
    /// Fraction of `max` currently in use, `0.0` when `max` is unknown
    pub fn used_rate(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.used as f64 / self.max as f64
    }
}

/// Counters for one garbage collector of the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbageCollectorInfo {
    /// Collector name as reported by the runtime
    pub name: String,
    /// Number of collections since process start
    pub collection_count: u64,
    /// Accumulated collection time in milliseconds
    pub collection_time_ms: u64,
}

/// Garbage collection measurement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbageInfo {
    /// Per-collector counters; empty for hosts without a managed runtime
    pub collectors: Vec<GarbageCollectorInfo>,
}

/// Thread measurement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    /// Live threads in the host process
    pub thread_count: u32,
    /// Highest live thread count observed by the collector
    pub peak_thread_count: u32,
}

/// A single measurement tagged with its metric key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceMetric {
    /// `CPU_USAGE`
    CpuUsage(CpuInfo),
    /// `MEM_USAGE`
    MemUsage(MemoryUsage),
    /// `MEM_NO_HEAP_USAGE`
    MemNoHeapUsage(MemoryUsage),
    /// `GARBAGE_INFO`
    GarbageInfo(GarbageInfo),
    /// `THREAD_INFO`
    ThreadInfo(ThreadInfo),
}

impl PerformanceMetric {
    /// Key this measurement was produced for
    pub fn key(&self) -> MetricKey {
        match self {
            Self::CpuUsage(_) => MetricKey::CpuUsage,
            Self::MemUsage(_) => MetricKey::MemUsage,
            Self::MemNoHeapUsage(_) => MetricKey::MemNoHeapUsage,
            Self::GarbageInfo(_) => MetricKey::GarbageInfo,
            Self::ThreadInfo(_) => MetricKey::ThreadInfo,
        }
    }

    /// CPU payload, if this is a `CPU_USAGE` measurement
    pub fn as_cpu(&self) -> Option<&CpuInfo> {
        match self {
            Self::CpuUsage(info) => Some(info),
            _ => None,
        }
    }

    /// Memory payload, for either memory key
    pub fn as_memory(&self) -> Option<&MemoryUsage> {
        match self {
            Self::MemUsage(usage) | Self::MemNoHeapUsage(usage) => Some(usage),
            _ => None,
        }
    }

    /// Garbage collection payload
    pub fn as_garbage(&self) -> Option<&GarbageInfo> {
        match self {
            Self::GarbageInfo(info) => Some(info),
            _ => None,
        }
    }

    /// Thread payload
    pub fn as_thread(&self) -> Option<&ThreadInfo> {
        match self {
            Self::ThreadInfo(info) => Some(info),
            _ => None,
        }
    }
}
