//! Sampling task and frame fan-out.
//!
//! One task exclusively owns the probe and the process tracker, samples at
//! a fixed cadence and broadcasts each frame to every subscriber. Keeping
//! a single sampler means tracker state never needs a lock and every
//! connected client sees deltas computed against the same baselines.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::aggregator;
use super::metrics::MetricsFrame;
use super::probe::SystemProbe;
use super::tracker::ProcessTracker;

/// Frames buffered per subscriber before it starts lagging.
const FRAME_CHANNEL_CAPACITY: usize = 16;

/// Handle to the background sampling task.
///
/// Cloneable; each WebSocket connection subscribes for its own frame
/// stream. Dropping all handles does not stop the task, only
/// [`MonitorHandle::shutdown`] does.
#[derive(Clone)]
pub struct MonitorHandle {
    frames_tx: broadcast::Sender<Arc<MetricsFrame>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl MonitorHandle {
    /// Subscribe to the frame stream, starting from the next cycle.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<MetricsFrame>> {
        self.frames_tx.subscribe()
    }

    /// Signal the sampling task to stop. Observed at the next cycle
    /// boundary.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Spawn the sampling task on the current tokio runtime.
pub fn spawn_monitor(probe: Box<dyn SystemProbe>, poll_interval: Duration) -> MonitorHandle {
    let (frames_tx, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    tokio::spawn(sampling_task(
        probe,
        poll_interval,
        frames_tx.clone(),
        shutdown_rx,
    ));

    MonitorHandle {
        frames_tx,
        shutdown_tx,
    }
}

async fn sampling_task(
    mut probe: Box<dyn SystemProbe>,
    poll_interval: Duration,
    frames_tx: broadcast::Sender<Arc<MetricsFrame>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut tracker = ProcessTracker::new();

    // First tick after one full interval so the probe has a measurement
    // window behind it.
    let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    log::info!(
        "Sampling task started ({} ms cadence)",
        poll_interval.as_millis()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match collect_frame(probe.as_mut(), &mut tracker) {
                    Ok(frame) => {
                        // send() only fails with no subscribers, which is fine.
                        let _ = frames_tx.send(Arc::new(frame));
                    }
                    // A failed cycle is skipped; tracker state stays valid
                    // for the next one.
                    Err(e) => log::warn!("Metrics cycle failed: {}", e),
                }
            }
            _ = shutdown.recv() => {
                log::info!("Sampling task shutting down");
                break;
            }
        }
    }
}

/// Run one full sampling cycle: refresh counters, reconcile the process
/// tracker and assemble the frame.
pub fn collect_frame(
    probe: &mut dyn SystemProbe,
    tracker: &mut ProcessTracker,
) -> crate::Result<MetricsFrame> {
    probe.refresh()?;

    let observations = probe.observe_processes();
    // Count every enumerable pid, independent of the sample cap.
    let process_count = observations.len();
    let processes = tracker.reconcile(observations, probe.core_count());

    Ok(MetricsFrame {
        timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
        system: aggregator::snapshot(probe),
        process_count,
        processes,
    })
}
