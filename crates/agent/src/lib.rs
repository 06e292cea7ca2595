//! Per-agent runtime: wires the autopilot streams, the telemetry
//! aggregator, the shared bus, and the flocking decision loop into one
//! supervised task set with a single shutdown path.
//!
//! The surrounding process owns the autopilot connection: it hands over
//! the six subscription receivers and a [`CommandSink`](swarmind_flocking::CommandSink),
//! then calls
//! [`AgentRuntime::shutdown`] when asked to stop. Arming, takeoff and
//! offboard sequencing stay with the autopilot collaborator.

mod config;
mod runtime;

pub use config::AgentConfig;
pub use runtime::AgentRuntime;
