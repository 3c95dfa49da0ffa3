// crates/psamp-core/src/comm/mod.rs

pub mod local;
pub mod solo;

use crate::error::CommError;

pub use local::{LocalCluster, LocalComm};
pub use solo::SoloComm;

/// Rank that consolidates and writes.
pub const COORDINATOR: usize = 0;

/// Receive side of a variable-length gather, coordinator only.
/// `counts` and `offsets` are in bytes and indexed by sending rank.
#[derive(Debug)]
pub struct GatherRecv<'a> {
    pub buf: &'a mut [u8],
    pub counts: &'a [usize],
    pub offsets: &'a [usize],
}

/// Collective operations between the nodes of one job.
///
/// Both collectives are full barriers: every rank must call them in the same
/// order, and none returns before the coordinator has everything.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Fixed-size all-to-one exchange. The coordinator gets every rank's
    /// value indexed by rank; everyone else gets `None`.
    fn gather_count(&self, value: u64) -> Result<Option<Vec<u64>>, CommError>;

    /// Variable-length all-to-one gather. The coordinator passes `Some(recv)`
    /// and receives rank `i`'s bytes at `recv.offsets[i]`; everyone else
    /// passes `None`.
    fn gather_bytes(&self, send: &[u8], recv: Option<GatherRecv<'_>>) -> Result<(), CommError>;

    /// Fatal reporter. Terminates the whole job: every other rank blocked in
    /// (or later entering) a collective fails with `CommError::Aborted`.
    fn abort(&self, code: i32, message: &str);
}

/// Shared checks for the coordinator's receive layout.
pub(crate) fn check_recv_layout(recv: &GatherRecv<'_>, size: usize) -> Result<(), CommError> {
    if recv.counts.len() != size {
        return Err(CommError::LengthMismatch {
            expected: size,
            actual: recv.counts.len(),
        });
    }
    if recv.offsets.len() != size {
        return Err(CommError::LengthMismatch {
            expected: size,
            actual: recv.offsets.len(),
        });
    }
    for (count, offset) in recv.counts.iter().zip(recv.offsets) {
        let end = offset.checked_add(*count).unwrap_or(usize::MAX);
        if end > recv.buf.len() {
            return Err(CommError::LengthMismatch {
                expected: end,
                actual: recv.buf.len(),
            });
        }
    }
    Ok(())
}
