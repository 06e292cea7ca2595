//! Per-agent telemetry aggregation and bus publishing.
//!
//! The autopilot pushes partial updates over six independent streams, each
//! at its own rate. One pump task per stream funnels updates into a single
//! mutex-guarded [`Aggregator`]; a separate publisher pump snapshots the
//! aggregator on a fixed cadence and merges it onto the shared bus. A
//! stream that errors out or ends only takes its own pump down — the
//! siblings and the publisher keep running.

mod aggregator;
mod publisher;
mod streams;

pub use aggregator::Aggregator;
pub use publisher::{PUBLISH_INTERVAL, publish_pump};
pub use streams::{
    AttitudeUpdate, BatteryUpdate, PositionUpdate, RawGpsUpdate, TelemetryStreams,
    VelocityNedUpdate, spawn_stream_pumps,
};
