//! System-wide snapshot assembly.
//!
//! Stateless across cycles: the OS exposes cumulative or instantaneous
//! values for everything here, unlike per-process CPU.

use super::metrics::{DiskTotals, NetworkTotals, SystemSnapshot};
use super::probe::SystemProbe;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Combine the probe's current counters into one immutable snapshot.
pub fn snapshot(probe: &dyn SystemProbe) -> SystemSnapshot {
    let memory = probe.memory();
    let memory_percent = if memory.total > 0 {
        (memory.used as f64 / memory.total as f64) * 100.0
    } else {
        0.0
    };

    let (disk_read, disk_write) = probe.disk_totals();
    let (net_sent, net_recv) = probe.network_totals();

    SystemSnapshot {
        cpu_percent: round1(probe.cpu_percent()),
        memory_percent: round1(memory_percent as f32),
        memory_used_gb: bytes_to_gb(memory.used),
        memory_total_gb: bytes_to_gb(memory.total),
        uptime: format_uptime(probe.uptime_secs()),
        disk: DiskTotals {
            read_bytes: disk_read,
            write_bytes: disk_write,
        },
        network: NetworkTotals {
            bytes_sent: net_sent,
            bytes_recv: net_recv,
        },
    }
}

/// Convert bytes to gigabytes rounded to 2 decimals.
pub fn bytes_to_gb(bytes: u64) -> f32 {
    ((bytes as f64 / BYTES_PER_GB) * 100.0).round() as f32 / 100.0
}

/// Format an uptime as its largest non-zero units: "{d}d {h}h {m}m" when
/// days > 0, "{h}h {m}m {s}s" when hours > 0, "{m}m {s}s" otherwise.
pub fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
