//! Per-agent connected/disconnected status for the dashboard.
//!
//! Derived purely from bus freshness: an agent the operator has commanded
//! active counts as connected while its id keeps appearing in freshly read
//! snapshots, and flips to disconnected once nothing fresh has been seen
//! for the timeout. Strictly observational — nothing here writes to the
//! bus or feeds back into the decision engine.

mod monitor;
mod pump;

pub use monitor::{DEFAULT_TIMEOUT, LivenessChange, LivenessMonitor};
pub use pump::{DASHBOARD_POLL_INTERVAL, liveness_pump};
