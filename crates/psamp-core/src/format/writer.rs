// crates/psamp-core/src/format/writer.rs

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::snapshot as snapshot_format;
use crate::particle::snapshot::Snapshot;

/// Serializes an assembled snapshot. The pipeline only calls this on the
/// coordinator, after consolidation.
pub trait SnapshotWriter {
    fn write(&mut self, path: &Path, snapshot: &Snapshot) -> Result<()>;
}

/// Writes the PSN1 layout to the filesystem.
#[derive(Debug, Default)]
pub struct BinaryWriter;

impl SnapshotWriter for BinaryWriter {
    fn write(&mut self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let bytes = snapshot_format::encode(snapshot);
        std::fs::write(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }
}

/// Keeps written snapshots in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub written: Vec<(PathBuf, Snapshot)>,
}

impl SnapshotWriter for MemoryWriter {
    fn write(&mut self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        self.written.push((path.to_path_buf(), snapshot.clone()));
        Ok(())
    }
}
