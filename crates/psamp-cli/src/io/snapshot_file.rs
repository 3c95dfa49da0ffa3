// crates/psamp-cli/src/io/snapshot_file.rs

use anyhow::{Context, Result};
use psamp_core::format::snapshot as snapshot_format;
use psamp_core::Snapshot;

/// Load a .psn file and decode it.
pub fn load_psn(path: &str) -> Result<Snapshot> {
    let bytes = load_psn_bytes(path)?;
    let snapshot = snapshot_format::decode(&bytes).with_context(|| format!("decode snapshot {path}"))?;
    Ok(snapshot)
}

pub fn load_psn_bytes(path: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read snapshot {path}"))
}

/// Save a snapshot as .psn; returns its content id.
pub fn save_psn(path: &str, snapshot: &Snapshot) -> Result<String> {
    let bytes = snapshot_format::encode(snapshot);
    std::fs::write(path, &bytes).with_context(|| format!("write snapshot {path}"))?;
    Ok(snapshot_format::snapshot_id_hex(&bytes)?)
}
