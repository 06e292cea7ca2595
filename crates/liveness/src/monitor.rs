use std::collections::HashMap;
use std::time::{Duration, Instant};

use swarmind_protocol::{AgentId, SwarmSnapshot};

/// No fresh snapshot entry for this long means disconnected.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// A connected-flag transition, emitted at most once per edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessChange {
    pub agent_id: AgentId,
    pub connected: bool,
}

#[derive(Debug, Default)]
struct AgentLiveness {
    commanded_active: bool,
    connected: bool,
    last_seen: Option<Instant>,
}

/// Tracks a connected/disconnected boolean per agent.
///
/// Transition rules:
/// - commanded active + id present in a freshly read snapshot → connected,
///   timestamp recorded;
/// - commanded active + nothing fresh within the timeout of the last
///   recorded timestamp → disconnected, exactly once (later empty reads
///   do not re-trigger until a new sample arrives);
/// - not commanded active → disconnected, whatever the bus says.
///
/// All methods are synchronous so a dashboard can query it directly.
#[derive(Debug)]
pub struct LivenessMonitor {
    agents: HashMap<AgentId, AgentLiveness>,
    timeout: Duration,
}

impl LivenessMonitor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agents: HashMap::new(),
            timeout,
        }
    }

    /// Operator action: mark an agent as commanded active or not.
    ///
    /// Deactivating forces disconnected immediately; the returned change
    /// reports that edge when there was one.
    pub fn set_commanded_active(&mut self, agent_id: &str, active: bool) -> Option<LivenessChange> {
        let entry = self.agents.entry(agent_id.to_owned()).or_default();
        entry.commanded_active = active;
        if !active && entry.connected {
            entry.connected = false;
            entry.last_seen = None;
            return Some(LivenessChange {
                agent_id: agent_id.to_owned(),
                connected: false,
            });
        }
        None
    }

    /// Feed one freshly read snapshot (`None` = no data this cycle).
    pub fn observe(&mut self, snapshot: Option<&SwarmSnapshot>) -> Vec<LivenessChange> {
        self.observe_at(snapshot, Instant::now())
    }

    /// Like [`observe`](Self::observe) with an explicit clock, so timeout
    /// behavior is testable without sleeping.
    pub fn observe_at(
        &mut self,
        snapshot: Option<&SwarmSnapshot>,
        now: Instant,
    ) -> Vec<LivenessChange> {
        let mut changes = Vec::new();

        for (agent_id, state) in &mut self.agents {
            if !state.commanded_active {
                continue;
            }

            let fresh = snapshot.is_some_and(|s| s.contains(agent_id));
            if fresh {
                state.last_seen = Some(now);
                if !state.connected {
                    state.connected = true;
                    changes.push(LivenessChange {
                        agent_id: agent_id.clone(),
                        connected: true,
                    });
                }
            } else if state.connected
                && state
                    .last_seen
                    .is_some_and(|seen| now.duration_since(seen) > self.timeout)
            {
                // Single edge: connected goes false once and stays false
                // through further empty reads.
                state.connected = false;
                changes.push(LivenessChange {
                    agent_id: agent_id.clone(),
                    connected: false,
                });
            }
        }

        changes
    }

    /// Current connected flag for one agent.
    pub fn is_connected(&self, agent_id: &str) -> bool {
        self.agents.get(agent_id).is_some_and(|s| s.connected)
    }

    /// All tracked agents and their connected flags, for display.
    pub fn statuses(&self) -> Vec<(AgentId, bool)> {
        let mut out: Vec<_> = self
            .agents
            .iter()
            .map(|(id, s)| (id.clone(), s.connected))
            .collect();
        out.sort();
        out
    }
}

impl Default for LivenessMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
