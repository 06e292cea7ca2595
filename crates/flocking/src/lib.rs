//! Distance-driven flocking decision engine.
//!
//! Once per control tick the engine reads the swarm snapshot from the
//! shared bus, finds the nearest neighbor by great-circle distance, and
//! classifies that distance into a zone (escape / separate / hold /
//! approach) that determines the velocity command sent back to the
//! autopilot. A tick that fails for any reason is logged and followed by
//! a short backoff — the loop itself never dies.

pub mod geo;

mod config;
mod engine;
mod sink;
mod zone;

pub use config::FlockingConfig;
pub use engine::{Decision, DecisionEngine, decision_loop};
pub use sink::{CommandError, CommandSink};
pub use zone::Zone;
