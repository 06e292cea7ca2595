//! Wire types for Swarmind agent-to-agent telemetry exchange.
//!
//! Agents broadcast their latest telemetry as a JSON map keyed by agent id.
//! Every telemetry field is optional: a field is absent until the
//! corresponding autopilot stream has delivered a first value, and absent
//! fields are omitted from the serialized object rather than encoded as
//! null.

mod sample;
mod snapshot;

pub use sample::{TelemetrySample, VelocityCommand};
pub use snapshot::SwarmSnapshot;

/// Identifier for one agent, unique within a swarm.
///
/// Assigned from configuration at startup and never reused concurrently
/// by two agents. Kept as text because it is also the JSON map key on the
/// wire.
pub type AgentId = String;
