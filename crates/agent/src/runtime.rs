use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use swarmind_bus::{BusError, SnapshotBus};
use swarmind_flocking::{CommandSink, DecisionEngine, decision_loop};
use swarmind_telemetry::{Aggregator, TelemetryStreams, publish_pump, spawn_stream_pumps};

use crate::AgentConfig;

/// The running task set of one agent.
///
/// Holds the bus handle shared by the publisher and the decision loop,
/// plus the join handles of every spawned pump. Dropping the runtime
/// without calling [`shutdown`](Self::shutdown) cancels the tasks but
/// leaves the region in place; only a clean shutdown lets the creator
/// unlink it.
pub struct AgentRuntime {
    agent_id: String,
    bus: Arc<Mutex<SnapshotBus>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl AgentRuntime {
    /// Opens (or creates) the bus and spawns the full task set: six
    /// stream pumps, the publisher pump, and the decision loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S: CommandSink + 'static>(
        config: AgentConfig,
        streams: TelemetryStreams,
        sink: S,
    ) -> Result<Self, BusError> {
        let bus = SnapshotBus::open_or_create(&config.bus)?;
        info!(
            agent = %config.agent_id,
            creator = bus.is_creator(),
            capacity = config.bus.capacity,
            "agent runtime starting"
        );
        let bus = Arc::new(Mutex::new(bus));

        let aggregator = Arc::new(Aggregator::new(config.agent_id.clone()));
        let cancel = CancellationToken::new();

        let mut tasks = spawn_stream_pumps(aggregator.clone(), streams, cancel.clone());
        tasks.push(tokio::spawn(publish_pump(
            aggregator,
            bus.clone(),
            config.publish_interval,
            cancel.clone(),
        )));
        tasks.push(tokio::spawn(decision_loop(
            DecisionEngine::new(config.agent_id.clone(), config.flocking),
            bus.clone(),
            sink,
            cancel.clone(),
        )));

        Ok(Self {
            agent_id: config.agent_id,
            bus,
            cancel,
            tasks,
        })
    }

    /// The shared bus handle, for in-process read-only consumers such as
    /// a liveness monitor or an embedded dashboard.
    pub fn bus(&self) -> Arc<Mutex<SnapshotBus>> {
        self.bus.clone()
    }

    /// Token cancelled when the runtime shuts down.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels every task, waits for them to finish, then detaches from
    /// the bus — unlinking the region if this process created it.
    pub async fn shutdown(self) -> Result<(), BusError> {
        info!(agent = %self.agent_id, "agent runtime shutting down");
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(agent = %self.agent_id, error = %e, "task ended abnormally");
            }
        }

        // All pumps are gone, so this is the last strong reference.
        match Arc::try_unwrap(self.bus) {
            Ok(bus) => bus.into_inner().close(true),
            Err(bus) => {
                // An external consumer still holds the handle; leave the
                // region to them rather than unmapping underneath.
                warn!(agent = %self.agent_id, "bus handle still shared, skipping unlink");
                drop(bus);
                Ok(())
            }
        }
    }
}
