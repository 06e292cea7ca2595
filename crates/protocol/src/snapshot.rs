use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AgentId, TelemetrySample};

/// The full mapping of all agents' latest known telemetry.
///
/// This is the only value exchanged over the shared bus. It is always
/// replaced wholesale on publish — never mutated in place across process
/// boundaries — so a torn read can at worst yield stale or missing data
/// for one cycle, never a corrupted partial record.
///
/// Backed by a `BTreeMap` so the encoded form is deterministic regardless
/// of insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwarmSnapshot {
    agents: BTreeMap<AgentId, TelemetrySample>,
}

impl SwarmSnapshot {
    /// An empty snapshot (no agents known yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one agent's entry with its current aggregator state.
    ///
    /// The entire per-agent object is swapped out; the publish cadence
    /// guarantees last-write-wins at the granularity of whole samples.
    pub fn merge(&mut self, agent_id: impl Into<AgentId>, sample: TelemetrySample) {
        self.agents.insert(agent_id.into(), sample);
    }

    /// Look up one agent's telemetry.
    pub fn get(&self, agent_id: &str) -> Option<&TelemetrySample> {
        self.agents.get(agent_id)
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    /// Iterate over all agents, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &TelemetrySample)> {
        self.agents.iter()
    }

    /// All agents except the one with the given id.
    pub fn others<'a>(
        &'a self,
        own_id: &'a str,
    ) -> impl Iterator<Item = (&'a AgentId, &'a TelemetrySample)> {
        self.agents.iter().filter(move |(id, _)| *id != own_id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Serialize to the wire form (compact JSON, absent fields omitted).
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from wire bytes (without sentinel or padding).
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
