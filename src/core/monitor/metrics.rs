use serde::{Deserialize, Serialize};

/// One frame pushed to each connected client per cycle.
///
/// Immutable once constructed; the process list is capped at 100 entries
/// sorted by cpu_percent descending, while `process_count` reflects every
/// pid enumerated this cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsFrame {
    pub timestamp: f64, // Unix seconds
    pub system: SystemSnapshot,
    pub process_count: usize,
    pub processes: Vec<ProcessSample>,
}

/// System-wide counters for one cycle. Fully recomputed each cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub memory_used_gb: f32,
    pub memory_total_gb: f32,
    pub uptime: String,
    pub disk: DiskTotals,
    pub network: NetworkTotals,
}

/// Cumulative disk I/O since boot, summed across devices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiskTotals {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Cumulative network I/O since boot, summed across interfaces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetworkTotals {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One process as reported to clients. Recomputed every cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub status: String,
    pub username: String,
}
