fn main() {
    println!("Run `cargo test -p swarm-scenarios` to execute the swarm scenario tests.");
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::{Mutex, mpsc};
    use tokio_util::sync::CancellationToken;

    use swarmind_agent::{AgentConfig, AgentRuntime};
    use swarmind_bus::{BusConfig, SnapshotBus};
    use swarmind_flocking::geo::EARTH_RADIUS_M;
    use swarmind_flocking::{CommandError, CommandSink};
    use swarmind_liveness::{LivenessMonitor, liveness_pump};
    use swarmind_protocol::{TelemetrySample, VelocityCommand};
    use swarmind_telemetry::{PositionUpdate, TelemetryStreams};

    /// Degrees of latitude spanning `meters`.
    fn north_deg(meters: f64) -> f64 {
        meters / (EARTH_RADIUS_M * PI / 180.0)
    }

    fn bus_config(dir: &tempfile::TempDir) -> BusConfig {
        BusConfig {
            name: "telemetry_shared".to_owned(),
            capacity: 4096,
            dir: dir.path().to_owned(),
        }
    }

    // --- Test doubles for the autopilot collaborator ---

    #[derive(Clone)]
    struct RecordingSink {
        sent: Arc<std::sync::Mutex<Vec<VelocityCommand>>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                sent: Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }

        fn commands(&self) -> Vec<VelocityCommand> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl CommandSink for RecordingSink {
        async fn send(&self, command: VelocityCommand) -> Result<(), CommandError> {
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    struct FakeAutopilot {
        position: mpsc::Sender<PositionUpdate>,
        _velocity: mpsc::Sender<swarmind_telemetry::VelocityNedUpdate>,
        attitude: mpsc::Sender<swarmind_telemetry::AttitudeUpdate>,
        _flight_mode: mpsc::Sender<String>,
        _battery: mpsc::Sender<swarmind_telemetry::BatteryUpdate>,
        _raw_gps: mpsc::Sender<swarmind_telemetry::RawGpsUpdate>,
    }

    fn fake_autopilot() -> (FakeAutopilot, TelemetryStreams) {
        let (position_tx, position) = mpsc::channel(64);
        let (velocity_tx, velocity) = mpsc::channel(64);
        let (attitude_tx, attitude) = mpsc::channel(64);
        let (flight_mode_tx, flight_mode) = mpsc::channel(64);
        let (battery_tx, battery) = mpsc::channel(64);
        let (raw_gps_tx, raw_gps) = mpsc::channel(64);
        (
            FakeAutopilot {
                position: position_tx,
                _velocity: velocity_tx,
                attitude: attitude_tx,
                _flight_mode: flight_mode_tx,
                _battery: battery_tx,
                _raw_gps: raw_gps_tx,
            },
            TelemetryStreams {
                position,
                velocity,
                attitude,
                flight_mode,
                battery,
                raw_gps,
            },
        )
    }

    async fn send_position(autopilot: &FakeAutopilot, lat: f64, lon: f64) {
        autopilot
            .position
            .send(PositionUpdate {
                latitude_deg: lat,
                longitude_deg: lon,
                absolute_altitude_m: 30.0,
            })
            .await
            .unwrap();
    }

    fn agent_config(dir: &tempfile::TempDir, agent_id: &str) -> AgentConfig {
        let mut config = AgentConfig::new(agent_id);
        config.bus = bus_config(dir);
        config
    }

    // --- Scenarios ---

    #[tokio::test]
    async fn two_agents_too_close_escape_each_other() {
        let dir = tempfile::tempdir().unwrap();

        let (ap1, streams1) = fake_autopilot();
        let sink1 = RecordingSink::new();
        let agent1 =
            AgentRuntime::start(agent_config(&dir, "1"), streams1, sink1.clone()).unwrap();

        let (ap2, streams2) = fake_autopilot();
        let sink2 = RecordingSink::new();
        let agent2 =
            AgentRuntime::start(agent_config(&dir, "2"), streams2, sink2.clone()).unwrap();

        // 8 m apart along the meridian, inside the 10 m escape radius.
        send_position(&ap1, 47.0, 8.0).await;
        send_position(&ap2, 47.0 + north_deg(8.0), 8.0).await;

        tokio::time::sleep(Duration::from_millis(400)).await;

        // Agent 1 flees south, agent 2 flees north, both at escape speed.
        let cmds1 = sink1.commands();
        let cmds2 = sink2.commands();
        assert!(!cmds1.is_empty() && !cmds2.is_empty());
        let last1 = cmds1.last().unwrap();
        let last2 = cmds2.last().unwrap();
        assert!((last1.horizontal_speed() - 3.5).abs() < 1e-6);
        assert!((last2.horizontal_speed() - 3.5).abs() < 1e-6);
        assert!(last1.north_m_s < 0.0);
        assert!(last2.north_m_s > 0.0);

        agent2.shutdown().await.unwrap();
        agent1.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn pair_at_target_distance_holds() {
        let dir = tempfile::tempdir().unwrap();

        let (ap1, streams1) = fake_autopilot();
        let sink1 = RecordingSink::new();
        let agent1 =
            AgentRuntime::start(agent_config(&dir, "1"), streams1, sink1.clone()).unwrap();

        let (ap2, streams2) = fake_autopilot();
        let sink2 = RecordingSink::new();
        let agent2 =
            AgentRuntime::start(agent_config(&dir, "2"), streams2, sink2.clone()).unwrap();

        ap1.attitude
            .send(swarmind_telemetry::AttitudeUpdate {
                roll_deg: 0.0,
                pitch_deg: 0.0,
                yaw_deg: 270.0,
            })
            .await
            .unwrap();
        send_position(&ap1, 47.0, 8.0).await;
        send_position(&ap2, 47.0 + north_deg(15.4), 8.0).await;

        tokio::time::sleep(Duration::from_millis(400)).await;

        let last = *sink1.commands().last().expect("agent 1 commanded");
        assert_eq!(last, VelocityCommand::hold(270.0));

        agent2.shutdown().await.unwrap();
        agent1.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn lone_agent_flies_free() {
        let dir = tempfile::tempdir().unwrap();

        let (ap, streams) = fake_autopilot();
        let sink = RecordingSink::new();
        let agent = AgentRuntime::start(agent_config(&dir, "1"), streams, sink.clone()).unwrap();

        ap.attitude
            .send(swarmind_telemetry::AttitudeUpdate {
                roll_deg: 0.0,
                pitch_deg: 0.0,
                yaw_deg: 45.0,
            })
            .await
            .unwrap();
        send_position(&ap, 47.0, 8.0).await;

        tokio::time::sleep(Duration::from_millis(400)).await;

        let last = *sink.commands().last().expect("free flight commanded");
        assert_eq!(last.north_m_s, 0.8);
        assert_eq!(last.east_m_s, 0.0);
        assert_eq!(last.down_m_s, 0.0);
        assert_eq!(last.yaw_deg, 45.0);

        agent.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn overflow_keeps_previous_snapshot_readable_by_everyone() {
        let dir = tempfile::tempdir().unwrap();
        let config = BusConfig {
            capacity: 160,
            ..bus_config(&dir)
        };

        let mut writer = SnapshotBus::open_or_create(&config).unwrap();
        let reader = SnapshotBus::open_or_create(&config).unwrap();

        writer
            .publish(
                "1",
                TelemetrySample {
                    latitude: Some(47.0),
                    longitude: Some(8.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let before = reader.read().unwrap();

        let oversized = TelemetrySample {
            flight_mode: Some("F".repeat(400)),
            ..Default::default()
        };
        assert!(writer.publish("2", oversized).is_err());

        // Readers in other "processes" still see the old snapshot.
        assert_eq!(reader.read().unwrap(), before);

        reader.close(false).unwrap();
        writer.close(true).unwrap();
    }

    #[tokio::test]
    async fn dashboard_sees_disconnect_once_after_publisher_stops() {
        let dir = tempfile::tempdir().unwrap();

        let (ap, streams) = fake_autopilot();
        let sink = RecordingSink::new();
        let agent = AgentRuntime::start(agent_config(&dir, "1"), streams, sink).unwrap();
        send_position(&ap, 47.0, 8.0).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Dashboard side: own attachment, fast poll, short timeout.
        let dash_bus = Arc::new(Mutex::new(
            SnapshotBus::open_or_create(&bus_config(&dir)).unwrap(),
        ));
        let monitor = Arc::new(std::sync::Mutex::new(LivenessMonitor::new(
            Duration::from_millis(150),
        )));
        monitor.lock().unwrap().set_commanded_active("1", true);

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let pump = tokio::spawn(liveness_pump(
            monitor.clone(),
            dash_bus,
            events_tx,
            Duration::from_millis(20),
            cancel.clone(),
        ));

        let connect = tokio::time::timeout(Duration::from_secs(2), events_rx.recv())
            .await
            .expect("connect edge")
            .unwrap();
        assert!(connect.connected);

        // Stop the publisher without unlinking (a kept handle skips the
        // unlink), then wipe the region in place. The dashboard's mapping
        // sees the zeroed pages, so polls read "no data" from here on.
        let keep_region = agent.bus();
        agent.shutdown().await.unwrap();
        {
            use std::io::Write as _;
            let mut f = std::fs::OpenOptions::new()
                .write(true)
                .open(dir.path().join("telemetry_shared"))
                .unwrap();
            f.write_all(&vec![0u8; 4096]).unwrap();
        }

        // Exactly one disconnect edge may follow.
        let disconnect = tokio::time::timeout(Duration::from_secs(2), events_rx.recv())
            .await
            .expect("disconnect edge")
            .unwrap();
        assert!(!disconnect.connected);

        // And nothing further while the bus stays stale.
        let extra = tokio::time::timeout(Duration::from_millis(400), events_rx.recv()).await;
        assert!(extra.is_err(), "unexpected extra liveness edge: {extra:?}");

        cancel.cancel();
        pump.await.unwrap();
        drop(keep_region);
    }

    #[tokio::test]
    async fn garbage_region_reads_as_no_data_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = vec![0u8; 4096];
        contents[..7].copy_from_slice(b"{\"1\": \x00");
        // NUL inside the JSON truncates the payload mid-object.
        std::fs::write(dir.path().join("telemetry_shared"), contents).unwrap();

        let bus = SnapshotBus::open_or_create(&bus_config(&dir)).unwrap();
        assert!(bus.read().is_none());

        let mut monitor = LivenessMonitor::new(Duration::from_secs(3));
        monitor.set_commanded_active("1", true);
        let changes = monitor.observe(None);
        assert!(changes.is_empty());
        assert!(!monitor.is_connected("1"));
    }
}
