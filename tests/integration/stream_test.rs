//! Behavior of the shared sampling loop against a scriptable probe.

use std::time::Duration;

use tokio::time::timeout;

use syspulse::core::monitor::{
    collect_frame, spawn_monitor, MetricsFrame, ProcessTracker,
};

use super::support::{live_set, FakeProbe};

const CYCLE: Duration = Duration::from_millis(50);
const RECV_TIMEOUT: Duration = Duration::from_secs(1);

#[tokio::test]
async fn test_all_subscribers_receive_frames() {
    let live = live_set(&[1, 2]);
    let monitor = spawn_monitor(Box::new(FakeProbe { live }), CYCLE);

    let mut rx_a = monitor.subscribe();
    let mut rx_b = monitor.subscribe();

    let frame_a = timeout(RECV_TIMEOUT, rx_a.recv())
        .await
        .expect("no frame within one cycle")
        .unwrap();
    let frame_b = timeout(RECV_TIMEOUT, rx_b.recv()).await.unwrap().unwrap();

    assert_eq!(frame_a.process_count, 2);
    assert_eq!(frame_b.process_count, 2);
    assert_eq!(frame_a.system.uptime, "1h 1m 1s");
    assert_eq!(frame_a.system.memory_used_gb, 2.0);

    // One subscriber going away must not affect the other.
    drop(rx_b);
    let next = timeout(RECV_TIMEOUT, rx_a.recv()).await.unwrap().unwrap();
    assert_eq!(next.process_count, 2);

    monitor.shutdown();
}

#[tokio::test]
async fn test_process_exit_between_cycles() {
    let live = live_set(&[10, 20]);
    let monitor = spawn_monitor(
        Box::new(FakeProbe { live: live.clone() }),
        CYCLE,
    );
    let mut rx = monitor.subscribe();

    let first = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(first.process_count, 2);

    // Process 20 exits.
    live.lock().unwrap().retain(|obs| obs.pid != 20);

    let frame = wait_for(&mut rx, |frame| frame.process_count == 1).await;
    assert!(frame.processes.iter().all(|p| p.pid != 20));

    monitor.shutdown();
}

#[tokio::test]
async fn test_shutdown_stops_the_sampling_task() {
    let live = live_set(&[1]);
    let monitor = spawn_monitor(Box::new(FakeProbe { live }), CYCLE);

    let mut rx = monitor.subscribe();
    timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();

    monitor.shutdown();
    tokio::time::sleep(CYCLE * 3).await;

    // A fresh subscriber sees no further frames once the task has stopped.
    let mut late_rx = monitor.subscribe();
    assert!(timeout(CYCLE * 4, late_rx.recv()).await.is_err());
}

#[test]
fn test_frame_json_shape() {
    let live = live_set(&[7]);
    let mut probe = FakeProbe { live };
    let mut tracker = ProcessTracker::new();

    let frame = collect_frame(&mut probe, &mut tracker).unwrap();
    let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();

    assert!(value["timestamp"].is_f64());
    assert_eq!(value["process_count"], 1);

    let system = &value["system"];
    for key in [
        "cpu_percent",
        "memory_percent",
        "memory_used_gb",
        "memory_total_gb",
        "uptime",
    ] {
        assert!(!system[key].is_null(), "missing system field {key}");
    }
    assert_eq!(system["disk"]["read_bytes"], 100);
    assert_eq!(system["disk"]["write_bytes"], 200);
    assert_eq!(system["network"]["bytes_sent"], 300);
    assert_eq!(system["network"]["bytes_recv"], 400);

    let proc = &value["processes"][0];
    for key in [
        "pid",
        "name",
        "cpu_percent",
        "memory_percent",
        "status",
        "username",
    ] {
        assert!(!proc[key].is_null(), "missing process field {key}");
    }
    assert_eq!(proc["pid"], 7);
    assert_eq!(proc["cpu_percent"], 0.0);
}

#[test]
fn test_process_count_independent_of_sample_cap() {
    let pids: Vec<u32> = (1..=150).collect();
    let live = live_set(&pids);
    let mut probe = FakeProbe { live };
    let mut tracker = ProcessTracker::new();

    let frame = collect_frame(&mut probe, &mut tracker).unwrap();

    assert_eq!(frame.process_count, 150);
    assert_eq!(frame.processes.len(), 100);
}

async fn wait_for(
    rx: &mut tokio::sync::broadcast::Receiver<std::sync::Arc<MetricsFrame>>,
    predicate: impl Fn(&MetricsFrame) -> bool,
) -> std::sync::Arc<MetricsFrame> {
    timeout(RECV_TIMEOUT * 2, async {
        loop {
            let frame = rx.recv().await.unwrap();
            if predicate(&frame) {
                return frame;
            }
        }
    })
    .await
    .expect("condition not reached within timeout")
}
