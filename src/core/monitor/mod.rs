//! System monitoring core functionality.
//!
//! This module provides the business logic for sampling OS counters and
//! turning them into per-interval metrics: the process tracker (per-pid
//! CPU-time deltas across cycles), the system aggregator (one immutable
//! snapshot per cycle), and the sampling runtime that fans frames out to
//! subscribers.

mod aggregator;
mod metrics;
mod probe;
mod runtime;
mod tracker;

pub use aggregator::{bytes_to_gb, format_uptime, snapshot};
pub use metrics::{DiskTotals, MetricsFrame, NetworkTotals, ProcessSample, SystemSnapshot};
pub use probe::{CpuTime, MemoryCounters, ProcessObservation, SysinfoProbe, SystemProbe};
pub use runtime::{collect_frame, spawn_monitor, MonitorHandle};
pub use tracker::{ProcessTracker, MAX_PROCESS_SAMPLES};
