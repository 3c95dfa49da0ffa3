// crates/psamp-core/src/exchange.rs

use tracing::debug;

use crate::comm::Communicator;
use crate::error::{CommError, Result};
use crate::particle::record::RECORD_SIZE;

/// Where every rank's sample lands in the coordinator's buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatherPlan {
    /// Records contributed per rank.
    pub nsub: Vec<u64>,
    /// Bytes contributed per rank.
    pub counts: Vec<usize>,
    /// Byte offset of each rank's contribution: exclusive prefix sum of `counts`.
    pub offsets: Vec<usize>,
    /// Consolidated record count `ns`.
    pub total: usize,
}

impl GatherPlan {
    /// Exclusive prefix sum over per-rank record counts. A rank with zero
    /// records keeps its slot at the running total.
    pub fn from_counts(nsub: &[u64]) -> std::result::Result<Self, CommError> {
        let overflow = || CommError::Protocol(format!("gather plan overflows: counts {nsub:?}"));

        let mut counts = Vec::with_capacity(nsub.len());
        let mut offsets = Vec::with_capacity(nsub.len());
        let mut total = 0usize;
        for &n in nsub {
            let n = usize::try_from(n).map_err(|_| overflow())?;
            let bytes = n.checked_mul(RECORD_SIZE).ok_or_else(overflow)?;
            offsets.push(total.checked_mul(RECORD_SIZE).ok_or_else(overflow)?);
            counts.push(bytes);
            total = total.checked_add(n).ok_or_else(overflow)?;
        }
        total.checked_mul(RECORD_SIZE).ok_or_else(overflow)?;

        Ok(Self {
            nsub: nsub.to_vec(),
            counts,
            offsets,
            total,
        })
    }

    pub fn total_bytes(&self) -> usize {
        self.total * RECORD_SIZE
    }
}

/// Collect every rank's `nsub` on the coordinator and plan the gather.
/// Full barrier. Only the coordinator gets a plan.
pub fn exchange_counts<C>(comm: &C, nsub_local: usize) -> Result<Option<GatherPlan>>
where
    C: Communicator + ?Sized,
{
    let Some(nsub) = comm.gather_count(nsub_local as u64)? else {
        return Ok(None);
    };
    let plan = GatherPlan::from_counts(&nsub)?;
    debug!(nodes = nsub.len(), total = plan.total, "counts exchanged");
    Ok(Some(plan))
}
