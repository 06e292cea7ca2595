//! Dashboard poll pump — read-only bus polling feeding the monitor.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use swarmind_bus::SnapshotBus;

use crate::{LivenessChange, LivenessMonitor};

/// Default dashboard poll cadence.
pub const DASHBOARD_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls the bus at `interval`, updates the monitor, and forwards
/// transition edges to the dashboard.
///
/// Read-only with respect to the bus. A full or closed events channel
/// drops the edge notification (the dashboard can still query
/// [`LivenessMonitor::statuses`]); it never blocks the poll loop.
pub async fn liveness_pump(
    monitor: Arc<Mutex<LivenessMonitor>>,
    bus: Arc<tokio::sync::Mutex<SnapshotBus>>,
    events_tx: mpsc::Sender<LivenessChange>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("liveness pump cancelled");
                break;
            }
            _ = ticker.tick() => {
                let snapshot = bus.lock().await.read();
                let changes = monitor
                    .lock()
                    .expect("liveness monitor lock poisoned")
                    .observe(snapshot.as_ref());
                for change in changes {
                    info!(
                        agent = %change.agent_id,
                        connected = change.connected,
                        "liveness transition"
                    );
                    let _ = events_tx.try_send(change);
                }
            }
        }
    }
}
