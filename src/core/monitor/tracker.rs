//! Per-process CPU-delta tracking and reconciliation.
//!
//! Raw OS counters only expose accumulated CPU time per process, so a
//! meaningful per-interval CPU percentage needs the previous reading for
//! every pid. `ProcessTracker` owns that table and reconciles it against
//! the live process set every cycle: new pids get a baseline (and report
//! 0.0 until a second reading exists), exited or unmeasurable pids are
//! evicted before the cycle's results are returned.
//!
//! Tracking is keyed solely by pid. A pid recycled by the OS between two
//! cycles is indistinguishable from the process that held it before; the
//! first sample after reuse may be off by one cycle. Accepted limitation.

use std::collections::{HashMap, HashSet};

use super::metrics::ProcessSample;
use super::probe::{CpuTime, ProcessObservation};

/// Maximum number of process samples returned per cycle.
pub const MAX_PROCESS_SAMPLES: usize = 100;

/// State retained for one tracked pid between cycles.
#[derive(Debug)]
struct TrackedProcess {
    last_cpu_time: CpuTime,
}

/// Tracks per-pid CPU-time readings across polling cycles.
///
/// Exclusively owned by the sampling task; resets to empty on startup.
#[derive(Debug, Default)]
pub struct ProcessTracker {
    tracked: HashMap<u32, TrackedProcess>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pids currently tracked.
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_tracked(&self, pid: u32) -> bool {
        self.tracked.contains_key(&pid)
    }

    /// Reconcile tracked state against this cycle's live process set and
    /// produce the ranked sample list.
    ///
    /// Returns at most [`MAX_PROCESS_SAMPLES`] samples sorted by
    /// `cpu_percent` descending (stable, so ties keep enumeration order).
    /// After this call, every tracked pid was present in `live`.
    pub fn reconcile(
        &mut self,
        live: Vec<ProcessObservation>,
        core_count: usize,
    ) -> Vec<ProcessSample> {
        let cores = core_count.max(1);

        let mut live_pids: HashSet<u32> = HashSet::with_capacity(live.len());
        let mut samples = Vec::with_capacity(live.len());

        for obs in live {
            live_pids.insert(obs.pid);

            // Unmeasurable this cycle (zombie, vanished, access denied):
            // drop any tracked state and skip the pid entirely.
            let Some(reading) = obs.cpu_time else {
                self.tracked.remove(&obs.pid);
                live_pids.remove(&obs.pid);
                continue;
            };

            let cpu_percent = match self.tracked.get_mut(&obs.pid) {
                Some(entry) => {
                    let pct = cpu_percent_between(entry.last_cpu_time, reading, cores);
                    entry.last_cpu_time = reading;
                    pct
                }
                None => {
                    // First observation: establish the baseline, no delta yet.
                    self.tracked.insert(
                        obs.pid,
                        TrackedProcess {
                            last_cpu_time: reading,
                        },
                    );
                    0.0
                }
            };

            samples.push(ProcessSample {
                pid: obs.pid,
                name: obs.name.unwrap_or_else(|| "Unknown".to_string()),
                cpu_percent,
                memory_percent: round1(obs.memory_percent),
                status: obs.status.unwrap_or_else(|| "unknown".to_string()),
                username: obs.username.unwrap_or_else(|| "N/A".to_string()),
            });
        }

        // Evict pids that exited between cycles.
        self.tracked.retain(|pid, _| live_pids.contains(pid));

        samples.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        samples.truncate(MAX_PROCESS_SAMPLES);
        samples
    }
}

/// CPU utilization between two readings, normalized by core count so a
/// single pegged core reports 100/N on an N-core machine.
fn cpu_percent_between(prev: CpuTime, cur: CpuTime, cores: usize) -> f32 {
    let elapsed = cur.at.saturating_duration_since(prev.at);
    if elapsed.is_zero() {
        return 0.0;
    }

    let cpu_ms = cur.total_ms.saturating_sub(prev.total_ms) as f64;
    let pct = cpu_ms / elapsed.as_millis() as f64 * 100.0 / cores as f64;
    round1(pct as f32)
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
