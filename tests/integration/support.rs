//! Shared test fixtures: a scriptable probe whose live process set can be
//! mutated between cycles.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use syspulse::core::monitor::{
    CpuTime, MemoryCounters, ProcessObservation, SystemProbe,
};
use syspulse::Result;

pub fn observation(pid: u32) -> ProcessObservation {
    ProcessObservation {
        pid,
        name: Some(format!("proc-{pid}")),
        status: Some("Sleeping".to_string()),
        username: Some("tester".to_string()),
        memory_percent: 1.5,
        cpu_time: Some(CpuTime {
            total_ms: 0,
            at: Instant::now(),
        }),
    }
}

pub fn live_set(pids: &[u32]) -> Arc<Mutex<Vec<ProcessObservation>>> {
    Arc::new(Mutex::new(pids.iter().copied().map(observation).collect()))
}

pub struct FakeProbe {
    pub live: Arc<Mutex<Vec<ProcessObservation>>>,
}

impl SystemProbe for FakeProbe {
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn core_count(&self) -> usize {
        4
    }

    fn observe_processes(&self) -> Vec<ProcessObservation> {
        self.live.lock().unwrap().clone()
    }

    fn cpu_percent(&self) -> f32 {
        7.5
    }

    fn memory(&self) -> MemoryCounters {
        MemoryCounters {
            total: 8 * 1_073_741_824,
            used: 2 * 1_073_741_824,
            available: 6 * 1_073_741_824,
        }
    }

    fn uptime_secs(&self) -> u64 {
        3661
    }

    fn disk_totals(&self) -> (u64, u64) {
        (100, 200)
    }

    fn network_totals(&self) -> (u64, u64) {
        (300, 400)
    }
}
