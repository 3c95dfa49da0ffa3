// crates/psamp-core/src/gather.rs

use crate::comm::{Communicator, GatherRecv};
use crate::error::{CommError, Result};
use crate::exchange::GatherPlan;
use crate::particle::record::{decode_records, Particle, RECORD_SIZE};
use crate::sampler::scratch::ScratchBuffer;

/// Every rank's sample, concatenated in rank order. Borrowed from the
/// coordinator's scratch buffer, right after its own local sample.
#[derive(Debug)]
pub struct ConsolidatedSet<'a> {
    bytes: &'a [u8],
}

impl<'a> ConsolidatedSet<'a> {
    pub fn len(&self) -> usize {
        self.bytes.len() / RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn particles(&self) -> Vec<Particle> {
        decode_records(self.bytes)
    }
}

/// Move every rank's local sample to the coordinator. Full barrier.
///
/// On the coordinator the receive area is the scratch tail, so the caller
/// must have run `capacity::check_global` against `plan` first.
pub fn gather<'a, C>(
    comm: &C,
    scratch: &'a mut ScratchBuffer,
    plan: Option<&GatherPlan>,
) -> Result<Option<ConsolidatedSet<'a>>>
where
    C: Communicator + ?Sized,
{
    if !comm.is_coordinator() {
        comm.gather_bytes(scratch.sample_bytes(), None)?;
        return Ok(None);
    }

    let plan = plan.ok_or_else(|| CommError::Protocol("coordinator has no gather plan".into()))?;
    let own = plan.nsub.get(comm.rank()).copied();
    if own != Some(scratch.len() as u64) {
        return Err(CommError::Protocol(format!(
            "plan lists {own:?} records for the coordinator, local sample has {}",
            scratch.len()
        ))
        .into());
    }

    {
        let (head, tail) = scratch.split_head_tail();
        comm.gather_bytes(
            head,
            Some(GatherRecv {
                buf: tail,
                counts: &plan.counts,
                offsets: &plan.offsets,
            }),
        )?;
    }

    let scratch: &'a ScratchBuffer = scratch;
    Ok(Some(ConsolidatedSet {
        bytes: scratch.tail_bytes(plan.total),
    }))
}
