//! Host memory/CPU sampling for the system health probe.

use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryMetrics {
    /// bytes
    pub total: u64,
    /// bytes
    pub available: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuMetrics {
    pub usage: f64,
    pub cores: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemSnapshot {
    pub memory: MemoryMetrics,
    pub cpu: CpuMetrics,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("System metrics are not supported on this platform")]
    Unsupported,

    #[error("Failed to read system metrics: {0}")]
    Unavailable(String),
}

/// Источник метрик хоста. Вызывается из blocking-пула.
pub trait SystemMetricsSource: Send + Sync {
    fn sample(&self) -> Result<SystemSnapshot, MetricsError>;
}

/// `sysinfo`-backed sampler. The `System` is kept between calls so CPU usage
/// is measured against the previous refresh.
pub struct SysinfoMetrics {
    system: Mutex<System>,
    primed: Mutex<bool>,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::new()
                .with_memory(MemoryRefreshKind::everything())
                .with_cpu(CpuRefreshKind::everything()),
        );
        Self {
            system: Mutex::new(system),
            primed: Mutex::new(false),
        }
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMetricsSource for SysinfoMetrics {
    fn sample(&self) -> Result<SystemSnapshot, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::Unsupported);
        }

        let mut system = self.system.lock();
        system.refresh_memory();
        system.refresh_cpu_usage();

        // first reading needs two refreshes separated by the minimum interval
        let mut primed = self.primed.lock();
        if !*primed {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            system.refresh_cpu_usage();
            *primed = true;
        }

        let total = system.total_memory();
        if total == 0 {
            return Err(MetricsError::Unavailable(
                "total memory reported as zero".to_string(),
            ));
        }
        let available = system.available_memory();

        Ok(SystemSnapshot {
            memory: MemoryMetrics {
                total,
                available,
                percent: memory_percent(total, available),
            },
            cpu: CpuMetrics {
                usage: f64::from(system.global_cpu_usage()),
                cores: system.cpus().len(),
            },
        })
    }
}

pub fn memory_percent(total: u64, available: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let used = total.saturating_sub(available) as f64;
    (used / total as f64 * 1000.0).round() / 10.0
}
