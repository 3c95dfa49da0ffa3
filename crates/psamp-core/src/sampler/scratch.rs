// crates/psamp-core/src/sampler/scratch.rs

use crate::error::{CapacityError, PsampError, Result};
use crate::particle::record::{decode_records, Particle, RECORD_SIZE};

/// Caller-provided scratch region, addressed in whole records.
///
/// Two roles share the same bytes:
/// - head `[0, len)`: this node's local sample, written by the sampler
/// - tail `[len, capacity)`: on the coordinator, the landing area for the
///   consolidated set
///
/// The tail only exists through `split_head_tail`, so nothing can write into
/// the head while the gather holds the tail.
#[derive(Debug)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl ScratchBuffer {
    pub fn with_capacity(records: usize) -> Result<Self> {
        let bytes = records.checked_mul(RECORD_SIZE).ok_or_else(|| {
            PsampError::Config(format!("scratch of {records} records overflows the address space"))
        })?;
        Ok(Self {
            bytes: vec![0u8; bytes],
            len: 0,
        })
    }

    /// Adopt an arbitrary memory block; a trailing partial record is unusable.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Self {
        let whole = bytes.len() / RECORD_SIZE * RECORD_SIZE;
        bytes.truncate(whole);
        Self { bytes, len: 0 }
    }

    /// Capacity in records (`nbuf`).
    pub fn capacity(&self) -> usize {
        self.bytes.len() / RECORD_SIZE
    }

    /// Records in the local sample.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append to the local sample. Refuses to run past capacity.
    pub fn push(&mut self, p: &Particle) -> std::result::Result<(), CapacityError> {
        if self.len >= self.capacity() {
            return Err(CapacityError::Overflow {
                capacity: self.capacity(),
            });
        }
        let off = self.len * RECORD_SIZE;
        p.write_to(&mut self.bytes[off..off + RECORD_SIZE]);
        self.len += 1;
        Ok(())
    }

    pub fn sample_bytes(&self) -> &[u8] {
        &self.bytes[..self.len * RECORD_SIZE]
    }

    pub fn sample(&self) -> Vec<Particle> {
        decode_records(self.sample_bytes())
    }

    /// Head (local sample, read-only) and tail (everything after it).
    pub fn split_head_tail(&mut self) -> (&[u8], &mut [u8]) {
        let (head, tail) = self.bytes.split_at_mut(self.len * RECORD_SIZE);
        (head, tail)
    }

    /// `count` records starting right after the local sample.
    pub fn tail_bytes(&self, count: usize) -> &[u8] {
        let start = self.len * RECORD_SIZE;
        &self.bytes[start..start + count * RECORD_SIZE]
    }
}
