//! Create-or-attach mapping of the shared region file.
//!
//! The region lives as a fixed-size file in a tmpfs directory and is
//! memory-mapped read/write by every participant. `create_new` makes the
//! create-or-attach race safe: exactly one process wins creation and
//! becomes responsible for unlinking on clean shutdown.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::BusError;

#[derive(Debug)]
pub(crate) struct SharedRegion {
    path: PathBuf,
    mmap: MmapMut,
    created: bool,
}

impl SharedRegion {
    /// Attach to the region at `path`, creating it if it does not exist.
    ///
    /// A freshly created region is sized to `capacity` and zero-filled
    /// (the caller writes the initial payload). Attaching verifies the
    /// existing file has exactly the agreed capacity.
    pub(crate) fn open_or_create(path: &Path, capacity: usize) -> Result<Self, BusError> {
        // Two attempts: losing the create race falls through to attach;
        // losing the attach race (creator unlinked in between) retries
        // the create once.
        for _ in 0..2 {
            match OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(path)
            {
                Ok(file) => {
                    file.set_len(capacity as u64)
                        .map_err(|e| BusError::Unavailable(e.to_string()))?;
                    let mmap = unsafe { MmapMut::map_mut(&file) }
                        .map_err(|e| BusError::Unavailable(e.to_string()))?;
                    return Ok(Self {
                        path: path.to_owned(),
                        mmap,
                        created: true,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(BusError::Unavailable(e.to_string())),
            }

            match OpenOptions::new().read(true).write(true).open(path) {
                Ok(file) => {
                    let len = file
                        .metadata()
                        .map_err(|e| BusError::Unavailable(e.to_string()))?
                        .len();
                    if len != capacity as u64 {
                        return Err(BusError::CapacityMismatch {
                            expected: capacity as u64,
                            actual: len,
                        });
                    }
                    let mmap = unsafe { MmapMut::map_mut(&file) }
                        .map_err(|e| BusError::Unavailable(e.to_string()))?;
                    return Ok(Self {
                        path: path.to_owned(),
                        mmap,
                        created: false,
                    });
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(BusError::Unavailable(e.to_string())),
            }
        }

        Err(BusError::Unavailable(format!(
            "create/attach race lost twice for {}",
            path.display()
        )))
    }

    /// Whether this handle created the region (and must unlink it).
    pub(crate) fn is_creator(&self) -> bool {
        self.created
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    /// Drop the mapping and, for the creator, remove the backing file.
    ///
    /// Attachers pass `unlink = true` harmlessly: only the creator ever
    /// releases the region, so a reader can never pull it out from under
    /// the creating process.
    pub(crate) fn close(self, unlink: bool) -> Result<(), BusError> {
        let path = self.path.clone();
        let created = self.created;
        drop(self.mmap);
        if unlink && created {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(BusError::Io(e)),
            }
        }
        Ok(())
    }
}
