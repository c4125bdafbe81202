//! OS counter sampling.
//!
//! `SystemProbe` is the seam between raw platform counters and the
//! monitoring core; the tracker and aggregator only ever see the types
//! defined here, which keeps them testable without touching the OS.

use std::time::Instant;

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessStatus,
    RefreshKind, System, Users,
};

use crate::error::Result;

/// An accumulated CPU-time reading for one process.
///
/// `total_ms` is the process's CPU time since it started; `at` is when the
/// reading was taken. Two readings give a delta CPU utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTime {
    pub total_ms: u64,
    pub at: Instant,
}

/// One live process as enumerated by the OS this cycle.
///
/// Optional fields are `None` when the platform does not report them;
/// `cpu_time: None` means the process is not measurable this cycle
/// (zombie, vanished, or access denied) and must be dropped from tracking.
#[derive(Debug, Clone)]
pub struct ProcessObservation {
    pub pid: u32,
    pub name: Option<String>,
    pub status: Option<String>,
    pub username: Option<String>,
    pub memory_percent: f32,
    pub cpu_time: Option<CpuTime>,
}

/// Raw memory counters in bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryCounters {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

/// Abstraction over platform counters consumed by the monitoring core.
pub trait SystemProbe: Send {
    /// Refresh all counters. Called once at the start of each cycle.
    fn refresh(&mut self) -> Result<()>;

    /// Number of logical cores. Implementations may report 0 when unknown;
    /// callers normalize to at least 1.
    fn core_count(&self) -> usize;

    /// Enumerate live processes with their per-cycle attributes.
    fn observe_processes(&self) -> Vec<ProcessObservation>;

    /// Instantaneous system-wide CPU utilization (0-100).
    fn cpu_percent(&self) -> f32;

    fn memory(&self) -> MemoryCounters;

    /// Seconds since boot.
    fn uptime_secs(&self) -> u64;

    /// Cumulative (read, written) bytes across all disks, zero when the
    /// platform exposes no counters.
    fn disk_totals(&self) -> (u64, u64);

    /// Cumulative (sent, received) bytes across all interfaces, zero when
    /// the platform exposes no counters.
    fn network_totals(&self) -> (u64, u64);
}

/// sysinfo-backed probe used in production.
pub struct SysinfoProbe {
    system: System,
    disks: Disks,
    networks: Networks,
    users: Users,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything())
            .with_processes(ProcessRefreshKind::everything());

        let mut system = System::new_with_specifics(refresh_kind);

        // sysinfo needs two refreshes separated by its minimum interval
        // before CPU usage values are meaningful.
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_all();

        Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe for SysinfoProbe {
    fn refresh(&mut self) -> Result<()> {
        self.system.refresh_all();
        self.disks.refresh(true);
        self.networks.refresh(true);
        Ok(())
    }

    fn core_count(&self) -> usize {
        self.system.cpus().len()
    }

    fn observe_processes(&self) -> Vec<ProcessObservation> {
        let total_memory = self.system.total_memory();
        let now = Instant::now();

        self.system
            .processes()
            .values()
            .map(|proc| {
                let status = proc.status();

                // Zombies have no measurable CPU time; pids that vanished or
                // denied access never show up in sysinfo's table at all.
                let cpu_time = if matches!(status, ProcessStatus::Zombie) {
                    None
                } else {
                    Some(CpuTime {
                        total_ms: proc.accumulated_cpu_time(),
                        at: now,
                    })
                };

                let name = proc.name().to_string_lossy();
                let username = proc
                    .user_id()
                    .and_then(|uid| self.users.get_user_by_id(uid))
                    .map(|user| user.name().to_string());

                ProcessObservation {
                    pid: proc.pid().as_u32(),
                    name: (!name.is_empty()).then(|| name.into_owned()),
                    status: match status {
                        ProcessStatus::Unknown(_) => None,
                        other => Some(other.to_string()),
                    },
                    username,
                    memory_percent: if total_memory > 0 {
                        (proc.memory() as f32 / total_memory as f32) * 100.0
                    } else {
                        0.0
                    },
                    cpu_time,
                }
            })
            .collect()
    }

    fn cpu_percent(&self) -> f32 {
        self.system.global_cpu_usage()
    }

    fn memory(&self) -> MemoryCounters {
        MemoryCounters {
            total: self.system.total_memory(),
            used: self.system.used_memory(),
            available: self.system.available_memory(),
        }
    }

    fn uptime_secs(&self) -> u64 {
        System::uptime()
    }

    fn disk_totals(&self) -> (u64, u64) {
        self.disks.iter().fold((0, 0), |(read, written), disk| {
            let usage = disk.usage();
            (
                read + usage.total_read_bytes,
                written + usage.total_written_bytes,
            )
        })
    }

    fn network_totals(&self) -> (u64, u64) {
        self.networks.values().fold((0, 0), |(sent, recv), data| {
            (
                sent + data.total_transmitted(),
                recv + data.total_received(),
            )
        })
    }
}
