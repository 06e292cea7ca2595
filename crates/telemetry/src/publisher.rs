//! Publisher pump — periodic snapshot merge onto the shared bus.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use swarmind_bus::{BusError, SnapshotBus};

use crate::Aggregator;

/// Default publish cadence, decoupled from stream arrival rates.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(10);

/// Publishes the aggregator state onto the bus every `interval`.
///
/// An overflowing snapshot skips that publish (previous bus contents stay
/// valid) and is logged for operator visibility; any other publish error
/// is logged and retried on the next tick. Nothing here can take the pump
/// down short of cancellation.
pub async fn publish_pump(
    aggregator: Arc<Aggregator>,
    bus: Arc<Mutex<SnapshotBus>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(agent = %aggregator.agent_id(), "publisher pump cancelled");
                break;
            }
            _ = ticker.tick() => {
                let sample = aggregator.snapshot();
                let result = bus.lock().await.publish(aggregator.agent_id(), sample);
                match result {
                    Ok(()) => {}
                    Err(BusError::Overflow { encoded, capacity }) => {
                        warn!(
                            agent = %aggregator.agent_id(),
                            encoded, capacity,
                            "snapshot too big for bus, publish skipped"
                        );
                    }
                    Err(e) => {
                        warn!(agent = %aggregator.agent_id(), error = %e, "publish failed");
                    }
                }
            }
        }
    }
}
