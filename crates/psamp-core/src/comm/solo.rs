// crates/psamp-core/src/comm/solo.rs

use crate::comm::{check_recv_layout, Communicator, GatherRecv, COORDINATOR};
use crate::error::CommError;

/// A job of one: the coordinator is the only rank, collectives are local copies.
#[derive(Debug, Default)]
pub struct SoloComm;

impl Communicator for SoloComm {
    fn rank(&self) -> usize {
        COORDINATOR
    }

    fn size(&self) -> usize {
        1
    }

    fn gather_count(&self, value: u64) -> Result<Option<Vec<u64>>, CommError> {
        Ok(Some(vec![value]))
    }

    fn gather_bytes(&self, send: &[u8], recv: Option<GatherRecv<'_>>) -> Result<(), CommError> {
        let recv = recv.ok_or_else(|| {
            CommError::Protocol("coordinator called gather without a receive buffer".into())
        })?;
        check_recv_layout(&recv, 1)?;
        if recv.counts[0] != send.len() {
            return Err(CommError::LengthMismatch {
                expected: recv.counts[0],
                actual: send.len(),
            });
        }
        let off = recv.offsets[0];
        recv.buf[off..off + send.len()].copy_from_slice(send);
        Ok(())
    }

    fn abort(&self, code: i32, message: &str) {
        // Nobody else to wake; the caller's error path ends the job.
        tracing::error!(code, "{message}");
    }
}
