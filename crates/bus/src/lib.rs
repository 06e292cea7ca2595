//! Fixed-capacity shared memory bus for swarm telemetry snapshots.
//!
//! All co-located agent processes agree on a region name and capacity at
//! configuration time. Exactly one process creates the region; everyone
//! else attaches. Each publish replaces the whole encoded snapshot
//! (JSON + NUL sentinel + zero padding), so readers sampling the buffer
//! mid-write see at worst an undecodable payload — which [`SnapshotBus::read`]
//! reports as "no data", never as an error.
//!
//! There is deliberately no cross-process lock: blocking the writer would
//! stall the control loop, and a torn read only costs one cycle of
//! staleness. Do not add one without re-validating the latency budget.

mod bus;
mod region;

pub use bus::{BusConfig, SnapshotBus};

/// Errors produced by the snapshot bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The region could not be created or attached; retry later.
    #[error("shared region unavailable: {0}")]
    Unavailable(String),

    /// An existing region does not have the agreed capacity.
    #[error("shared region is {actual} bytes, expected {expected}")]
    CapacityMismatch { expected: u64, actual: u64 },

    /// The encoded snapshot would reach or exceed capacity.
    ///
    /// The write was skipped entirely; the previous contents are intact.
    #[error("encoded snapshot ({encoded} bytes) does not fit in {capacity}-byte region")]
    Overflow { encoded: usize, capacity: usize },

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
