use serde::{Deserialize, Serialize};

/// Latest known telemetry for a single agent.
///
/// Each field is fed by an independent autopilot subscription and stays
/// `None` until that stream delivers a first value. Updates are
/// last-write-wins; a field is never rolled back to an older value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_altitude: Option<f64>,
    /// Horizontal ground speed in m/s (hypot of north/east velocity).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellites_visible: Option<u32>,
}

impl TelemetrySample {
    /// Whether both horizontal coordinates are known.
    ///
    /// Agents without a full position cannot take part in distance
    /// calculations and are skipped by nearest-neighbor selection.
    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Velocity setpoint sent back to the autopilot.
///
/// NED frame: positive north/east/down in m/s, plus an absolute yaw
/// heading in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    pub north_m_s: f64,
    pub east_m_s: f64,
    pub down_m_s: f64,
    pub yaw_deg: f64,
}

impl VelocityCommand {
    /// A zero-velocity command holding the given heading.
    pub fn hold(yaw_deg: f64) -> Self {
        Self {
            north_m_s: 0.0,
            east_m_s: 0.0,
            down_m_s: 0.0,
            yaw_deg,
        }
    }

    /// Horizontal speed magnitude in m/s.
    pub fn horizontal_speed(&self) -> f64 {
        self.north_m_s.hypot(self.east_m_s)
    }
}
