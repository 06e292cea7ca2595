//! The snapshot bus: read-merge-write exchange of [`SwarmSnapshot`]s.

use std::path::PathBuf;

use tracing::{debug, trace};

use swarmind_protocol::{SwarmSnapshot, TelemetrySample};

use crate::BusError;
use crate::region::SharedRegion;

/// Payload terminator. Everything past the first NUL is padding.
const SENTINEL: u8 = 0;

/// Bus identity agreed by all participants at configuration time.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Well-known region name (file name inside `dir`).
    pub name: String,
    /// Hard capacity ceiling in bytes.
    pub capacity: usize,
    /// Directory holding the region file. Defaults to tmpfs on Linux.
    pub dir: PathBuf,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            name: "telemetry_shared".to_owned(),
            capacity: 4096,
            dir: default_dir(),
        }
    }
}

#[cfg(target_os = "linux")]
fn default_dir() -> PathBuf {
    PathBuf::from("/dev/shm")
}

#[cfg(not(target_os = "linux"))]
fn default_dir() -> PathBuf {
    std::env::temp_dir()
}

impl BusConfig {
    fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// Handle to the shared snapshot region.
///
/// One publisher and any number of readers per host. Reads tolerate torn
/// or garbage contents by reporting `None`; publishes that would overflow
/// the region are skipped wholesale, leaving the previous snapshot valid.
pub struct SnapshotBus {
    region: SharedRegion,
    capacity: usize,
}

impl SnapshotBus {
    /// Attach to the named region, creating and initializing it (empty
    /// snapshot, zero-padded) if this process is first.
    pub fn open_or_create(config: &BusConfig) -> Result<Self, BusError> {
        let path = config.path();
        let mut region = SharedRegion::open_or_create(&path, config.capacity)?;
        if region.is_creator() {
            // Fresh region is already zero-filled; just lay down the
            // encoded empty snapshot.
            region.bytes_mut()[..2].copy_from_slice(b"{}");
            debug!(region = %path.display(), capacity = config.capacity, "created snapshot bus");
        } else {
            debug!(region = %path.display(), "attached to existing snapshot bus");
        }
        Ok(Self {
            region,
            capacity: config.capacity,
        })
    }

    /// Whether this handle created the region.
    pub fn is_creator(&self) -> bool {
        self.region.is_creator()
    }

    /// Decode the current snapshot, if any.
    ///
    /// Returns `None` on an empty payload or undecodable contents
    /// (including torn reads). Callers treat every `None` the same way:
    /// no data this cycle, try again on the next one.
    pub fn read(&self) -> Option<SwarmSnapshot> {
        let buf = self.region.bytes();
        let end = buf.iter().position(|&b| b == SENTINEL).unwrap_or(buf.len());
        let payload = &buf[..end];
        if payload.is_empty() {
            return None;
        }
        match SwarmSnapshot::decode(payload) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                trace!(error = %e, "undecodable snapshot payload, treating as no data");
                None
            }
        }
    }

    /// Merge `{agent_id: sample}` into the current snapshot and write the
    /// result back.
    ///
    /// The previous buffer contents are decoded first (decode failure is
    /// treated as an empty map) so entries published by other agents are
    /// preserved. If the encoded result would reach or exceed capacity the
    /// write is skipped entirely and [`BusError::Overflow`] is returned;
    /// the region keeps its previous contents.
    pub fn publish(&mut self, agent_id: &str, sample: TelemetrySample) -> Result<(), BusError> {
        let mut snapshot = self.read().unwrap_or_default();
        snapshot.merge(agent_id, sample);
        let encoded = snapshot.encode()?;

        // Strictly less than capacity: the sentinel byte must fit too.
        if encoded.len() >= self.capacity {
            return Err(BusError::Overflow {
                encoded: encoded.len(),
                capacity: self.capacity,
            });
        }

        let buf = self.region.bytes_mut();
        buf[..encoded.len()].copy_from_slice(&encoded);
        // Zero the remainder so the sentinel scan never runs into stale
        // bytes from a longer previous snapshot.
        buf[encoded.len()..].fill(0);
        Ok(())
    }

    /// Detach from the region. The creator additionally releases the
    /// underlying file when `unlink` is set; attachers never do.
    pub fn close(self, unlink: bool) -> Result<(), BusError> {
        self.region.close(unlink)
    }
}
