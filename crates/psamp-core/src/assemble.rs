// crates/psamp-core/src/assemble.rs

use crate::gather::ConsolidatedSet;
use crate::particle::snapshot::Snapshot;

/// Build the consolidated snapshot. Cosmology is carried over verbatim; the
/// result is a single non-distributed collection, so all three counts equal
/// `ns`. `nc` is 0 for random subsamples (not a regular grid).
pub fn assemble(base: &Snapshot, set: &ConsolidatedSet<'_>, nc: u32) -> Snapshot {
    Snapshot::whole(set.particles(), base.cosmology, nc)
}
