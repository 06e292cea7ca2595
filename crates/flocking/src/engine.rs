//! Per-tick decision logic and the control loop driving it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use swarmind_bus::SnapshotBus;
use swarmind_protocol::{AgentId, SwarmSnapshot, TelemetrySample, VelocityCommand};

use crate::geo::{self, UNKNOWN_DISTANCE_M};
use crate::{CommandSink, FlockingConfig, Zone};

/// Outcome of one decision tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Own sample missing from the snapshot: do nothing this tick.
    Idle,
    /// Send this command and pace the loop by the zone's interval.
    Command {
        zone: Zone,
        command: VelocityCommand,
    },
}

/// Converts a swarm snapshot into a velocity command for one agent.
///
/// [`decide`](Self::decide) is pure: all I/O (bus reads, command sends,
/// sleeps) lives in [`decision_loop`], which makes the state machine
/// directly testable against hand-built snapshots.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    agent_id: AgentId,
    config: FlockingConfig,
}

impl DecisionEngine {
    pub fn new(agent_id: impl Into<AgentId>, config: FlockingConfig) -> Self {
        Self {
            agent_id: agent_id.into(),
            config,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Run the state machine for one tick against the given snapshot.
    pub fn decide(&self, snapshot: &SwarmSnapshot) -> Decision {
        let Some(own) = snapshot.get(&self.agent_id) else {
            return Decision::Idle;
        };
        let own_yaw = own.yaw.unwrap_or(0.0);

        let Some((neighbor, distance_m)) = self.nearest_neighbor(own, snapshot) else {
            // Nobody (with a usable position) out there: free flight on
            // the current heading at cruise speed.
            return Decision::Command {
                zone: Zone::FreeFlight,
                command: VelocityCommand {
                    north_m_s: self.config.normal_speed_m_s,
                    east_m_s: 0.0,
                    down_m_s: 0.0,
                    yaw_deg: own_yaw,
                },
            };
        };

        // Both positions are complete here, nearest_neighbor guarantees it.
        let (own_lat, own_lon) = (own.latitude.unwrap_or(0.0), own.longitude.unwrap_or(0.0));
        let (nb_lat, nb_lon) = (
            neighbor.latitude.unwrap_or(0.0),
            neighbor.longitude.unwrap_or(0.0),
        );
        let yaw_to_neighbor = geo::steer_angle_deg(own_lat, own_lon, nb_lat, nb_lon);

        let zone = Zone::classify(distance_m, &self.config);
        let command = match zone {
            Zone::Escape => {
                let away = geo::steer_angle_rad(nb_lat, nb_lon, own_lat, own_lon);
                let (north, east) = geo::velocity_along(away, self.config.escape_speed_m_s);
                VelocityCommand {
                    north_m_s: north,
                    east_m_s: east,
                    down_m_s: 0.0,
                    yaw_deg: own_yaw,
                }
            }
            Zone::Separate => {
                let away = geo::steer_angle_rad(nb_lat, nb_lon, own_lat, own_lon);
                let (north, east) = geo::velocity_along(away, self.config.cohesion_speed_m_s);
                VelocityCommand {
                    north_m_s: north,
                    east_m_s: east,
                    down_m_s: 0.0,
                    yaw_deg: yaw_to_neighbor,
                }
            }
            Zone::Hold => VelocityCommand::hold(own_yaw),
            Zone::Approach => {
                let toward = geo::steer_angle_rad(own_lat, own_lon, nb_lat, nb_lon);
                let (north, east) = geo::velocity_along(toward, self.config.cohesion_speed_m_s);
                VelocityCommand {
                    north_m_s: north,
                    east_m_s: east,
                    down_m_s: 0.0,
                    yaw_deg: yaw_to_neighbor,
                }
            }
            // classify never returns FreeFlight; handled above.
            Zone::FreeFlight => unreachable!("classify yields neighbor zones only"),
        };

        Decision::Command { zone, command }
    }

    /// The other agent at minimum great-circle distance.
    ///
    /// Agents with any missing coordinate score the [`UNKNOWN_DISTANCE_M`]
    /// sentinel and are excluded, so a swarm where nobody (or we
    /// ourselves) has a position yet degrades to free flight instead of
    /// chasing a phantom neighbor.
    fn nearest_neighbor<'a>(
        &'a self,
        own: &TelemetrySample,
        snapshot: &'a SwarmSnapshot,
    ) -> Option<(&'a TelemetrySample, f64)> {
        snapshot
            .others(&self.agent_id)
            .map(|(_, sample)| (sample, geo::distance_between(own, sample)))
            .filter(|&(_, d)| d < UNKNOWN_DISTANCE_M)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Drives [`DecisionEngine::decide`] against the live bus until cancelled.
///
/// Every tick: read the bus (a missing or undecodable snapshot is "no
/// data", not an error), decide, push the command to the sink, then sleep
/// for the zone-specific interval. Sink failures are tick faults: logged,
/// followed by the configured backoff, never fatal.
pub async fn decision_loop<S: CommandSink>(
    engine: DecisionEngine,
    bus: Arc<Mutex<SnapshotBus>>,
    sink: S,
    cancel: CancellationToken,
) {
    info!(agent = %engine.agent_id(), "decision loop started");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let snapshot = bus.lock().await.read();
        let delay = match snapshot {
            None => {
                debug!(agent = %engine.agent_id(), "no snapshot on bus");
                engine.config.idle_interval
            }
            Some(snapshot) => match engine.decide(&snapshot) {
                Decision::Idle => engine.config.idle_interval,
                Decision::Command { zone, command } => {
                    debug!(
                        agent = %engine.agent_id(),
                        zone = ?zone,
                        north = command.north_m_s,
                        east = command.east_m_s,
                        yaw = command.yaw_deg,
                        "tick"
                    );
                    match sink.send(command).await {
                        Ok(()) => zone.tick_interval(),
                        Err(e) => {
                            warn!(agent = %engine.agent_id(), error = %e, "tick fault");
                            engine.config.fault_backoff
                        }
                    }
                }
            },
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    info!(agent = %engine.agent_id(), "decision loop stopped");
}
