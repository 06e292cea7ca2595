use std::time::Duration;

/// Flocking tunables, supplied as plain values by the surrounding process.
///
/// Invariant: `escape_speed_m_s > cohesion_speed_m_s > normal_speed_m_s`.
#[derive(Debug, Clone)]
pub struct FlockingConfig {
    /// Below this nearest-neighbor distance the agent escapes.
    pub escape_distance_m: f64,
    /// Separation distance the swarm tries to hold (±1 m band).
    pub target_distance_m: f64,
    /// Speed used when escaping a too-close neighbor.
    pub escape_speed_m_s: f64,
    /// Speed used to separate from or approach the target distance.
    pub cohesion_speed_m_s: f64,
    /// Free-flight speed when no neighbor is known.
    pub normal_speed_m_s: f64,
    /// Sleep after a tick that had no snapshot or no own sample.
    pub idle_interval: Duration,
    /// Backoff after a failed tick.
    pub fault_backoff: Duration,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            escape_distance_m: 10.0,
            target_distance_m: 15.0,
            escape_speed_m_s: 3.5,
            cohesion_speed_m_s: 1.2,
            normal_speed_m_s: 0.8,
            idle_interval: Duration::from_millis(20),
            fault_backoff: Duration::from_millis(50),
        }
    }
}
