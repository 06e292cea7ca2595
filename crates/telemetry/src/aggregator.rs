use std::sync::Mutex;

use swarmind_protocol::{AgentId, TelemetrySample};

use crate::streams::{
    AttitudeUpdate, BatteryUpdate, PositionUpdate, RawGpsUpdate, VelocityNedUpdate,
};

/// One agent's best-known telemetry under concurrent field updates.
///
/// Every `apply_*` call and `snapshot()` goes through a single internal
/// mutex, so updates from different streams may interleave in any order
/// but each individual merge is atomic. All operations are O(1) and never
/// touch I/O. Fields stay unknown (`None`) until their stream delivers.
#[derive(Debug)]
pub struct Aggregator {
    agent_id: AgentId,
    state: Mutex<TelemetrySample>,
}

impl Aggregator {
    pub fn new(agent_id: impl Into<AgentId>) -> Self {
        Self {
            agent_id: agent_id.into(),
            state: Mutex::new(TelemetrySample::default()),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn apply_position(&self, update: PositionUpdate) {
        let mut state = self.state.lock().expect("aggregator lock poisoned");
        state.latitude = Some(update.latitude_deg);
        state.longitude = Some(update.longitude_deg);
        state.absolute_altitude = Some(update.absolute_altitude_m);
    }

    /// Stores horizontal ground speed derived from the NED velocity.
    pub fn apply_velocity_ned(&self, update: VelocityNedUpdate) {
        let speed = update.north_m_s.hypot(update.east_m_s);
        self.state.lock().expect("aggregator lock poisoned").speed = Some(speed);
    }

    pub fn apply_attitude(&self, update: AttitudeUpdate) {
        let mut state = self.state.lock().expect("aggregator lock poisoned");
        state.roll = Some(update.roll_deg);
        state.pitch = Some(update.pitch_deg);
        state.yaw = Some(update.yaw_deg);
    }

    pub fn apply_flight_mode(&self, mode: String) {
        self.state
            .lock()
            .expect("aggregator lock poisoned")
            .flight_mode = Some(mode);
    }

    /// Stores battery charge as a percentage (the autopilot reports a
    /// remaining fraction in `0.0..=1.0`).
    pub fn apply_battery(&self, update: BatteryUpdate) {
        self.state
            .lock()
            .expect("aggregator lock poisoned")
            .battery_percent = Some(update.remaining_fraction * 100.0);
    }

    pub fn apply_raw_gps(&self, update: RawGpsUpdate) {
        self.state
            .lock()
            .expect("aggregator lock poisoned")
            .satellites_visible = Some(update.satellites_visible);
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> TelemetrySample {
        self.state.lock().expect("aggregator lock poisoned").clone()
    }
}
