//! Autopilot subscription pumps.
//!
//! The autopilot collaborator pushes partial updates over six independent
//! channels. One pump task per channel merges into the shared
//! [`Aggregator`]; a closed or errored stream ends only its own pump.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Aggregator;

/// Position fix from the autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub absolute_altitude_m: f64,
}

/// NED-frame velocity from the autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityNedUpdate {
    pub north_m_s: f64,
    pub east_m_s: f64,
    pub down_m_s: f64,
}

/// Euler attitude from the autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeUpdate {
    pub roll_deg: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Battery state from the autopilot (remaining charge as a fraction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryUpdate {
    pub remaining_fraction: f64,
}

/// Raw GPS info from the autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawGpsUpdate {
    pub satellites_visible: u32,
}

/// The six push-style autopilot subscriptions, one receiver each.
///
/// The adapter owning the autopilot connection keeps the senders and
/// forwards each subscription's items at whatever rate they arrive.
pub struct TelemetryStreams {
    pub position: mpsc::Receiver<PositionUpdate>,
    pub velocity: mpsc::Receiver<VelocityNedUpdate>,
    pub attitude: mpsc::Receiver<AttitudeUpdate>,
    pub flight_mode: mpsc::Receiver<String>,
    pub battery: mpsc::Receiver<BatteryUpdate>,
    pub raw_gps: mpsc::Receiver<RawGpsUpdate>,
}

/// Spawns one pump task per subscription, returning their join handles.
///
/// Each pump runs until cancellation or until its stream ends. Stream
/// termination is a per-field fault: it is logged and that pump exits,
/// while the remaining pumps keep merging their fields.
pub fn spawn_stream_pumps(
    aggregator: Arc<Aggregator>,
    streams: TelemetryStreams,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let TelemetryStreams {
        position,
        velocity,
        attitude,
        flight_mode,
        battery,
        raw_gps,
    } = streams;

    vec![
        spawn_pump("position", position, aggregator.clone(), cancel.clone(), |agg, u| {
            agg.apply_position(u)
        }),
        spawn_pump("velocity", velocity, aggregator.clone(), cancel.clone(), |agg, u| {
            agg.apply_velocity_ned(u)
        }),
        spawn_pump("attitude", attitude, aggregator.clone(), cancel.clone(), |agg, u| {
            agg.apply_attitude(u)
        }),
        spawn_pump(
            "flight_mode",
            flight_mode,
            aggregator.clone(),
            cancel.clone(),
            |agg, u| agg.apply_flight_mode(u),
        ),
        spawn_pump("battery", battery, aggregator.clone(), cancel.clone(), |agg, u| {
            agg.apply_battery(u)
        }),
        spawn_pump("raw_gps", raw_gps, aggregator, cancel, |agg, u| {
            agg.apply_raw_gps(u)
        }),
    ]
}

fn spawn_pump<T, F>(
    stream: &'static str,
    mut rx: mpsc::Receiver<T>,
    aggregator: Arc<Aggregator>,
    cancel: CancellationToken,
    apply: F,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Fn(&Aggregator, T) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(agent = %aggregator.agent_id(), stream, "stream pump cancelled");
                    break;
                }
                item = rx.recv() => match item {
                    Some(update) => apply(&aggregator, update),
                    None => {
                        // Isolated fault: only this field stops updating.
                        warn!(agent = %aggregator.agent_id(), stream, "telemetry stream ended");
                        break;
                    }
                },
            }
        }
    })
}
