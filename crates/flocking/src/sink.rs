use std::future::Future;

use swarmind_protocol::VelocityCommand;

/// Failure to deliver a command to the autopilot.
///
/// Treated as a tick fault by the control loop: logged, backed off,
/// retried on the next tick.
#[derive(Debug, thiserror::Error)]
#[error("command rejected: {0}")]
pub struct CommandError(pub String);

/// Where velocity commands go — the autopilot's offboard command sink.
///
/// The only thing this core sends outward. Implemented by the autopilot
/// adapter owned by the surrounding process.
pub trait CommandSink: Send + Sync {
    fn send(
        &self,
        command: VelocityCommand,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;
}
