use std::time::Duration;

use swarmind_bus::BusConfig;
use swarmind_flocking::FlockingConfig;
use swarmind_protocol::AgentId;
use swarmind_telemetry::PUBLISH_INTERVAL;

/// Everything one agent process needs, supplied as plain values.
///
/// There is deliberately no CLI or file-loading layer here; the
/// surrounding process decides where these values come from.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// This agent's id, unique within the swarm.
    pub agent_id: AgentId,
    /// Shared bus identity (name, capacity, directory).
    pub bus: BusConfig,
    /// Cadence of the telemetry publisher pump.
    pub publish_interval: Duration,
    /// Flocking tunables for the decision engine.
    pub flocking: FlockingConfig,
}

impl AgentConfig {
    /// Defaults for everything except the agent id.
    pub fn new(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            bus: BusConfig::default(),
            publish_interval: PUBLISH_INTERVAL,
            flocking: FlockingConfig::default(),
        }
    }
}
