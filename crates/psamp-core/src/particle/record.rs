// crates/psamp-core/src/particle/record.rs

/// Bytes per particle on the wire and on disk.
pub const RECORD_SIZE: usize = 32;

/// Minimal N-body particle: position, velocity, 1-based id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: [f32; 3],
    pub v: [f32; 3],
    pub id: u64,
}

impl Particle {
    /// Layout (little-endian): x[3]:f32 v[3]:f32 id:u64
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut b = [0u8; RECORD_SIZE];
        self.write_to(&mut b);
        b
    }

    /// Writes exactly `RECORD_SIZE` bytes into the front of `out`.
    pub fn write_to(&self, out: &mut [u8]) {
        let out = &mut out[..RECORD_SIZE];
        for k in 0..3 {
            out[4 * k..4 * k + 4].copy_from_slice(&self.x[k].to_le_bytes());
            out[12 + 4 * k..16 + 4 * k].copy_from_slice(&self.v[k].to_le_bytes());
        }
        out[24..32].copy_from_slice(&self.id.to_le_bytes());
    }

    /// Reads one record from the front of `b`. Caller guarantees `b.len() >= RECORD_SIZE`.
    pub fn from_bytes(b: &[u8]) -> Self {
        let f = |off: usize| f32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]]);
        let mut id = [0u8; 8];
        id.copy_from_slice(&b[24..32]);
        Particle {
            x: [f(0), f(4), f(8)],
            v: [f(12), f(16), f(20)],
            id: u64::from_le_bytes(id),
        }
    }
}

/// Decode a run of whole records. Trailing partial bytes are ignored.
pub fn decode_records(bytes: &[u8]) -> Vec<Particle> {
    bytes
        .chunks_exact(RECORD_SIZE)
        .map(Particle::from_bytes)
        .collect()
}

pub fn encode_records(particles: &[Particle]) -> Vec<u8> {
    let mut out = Vec::with_capacity(particles.len() * RECORD_SIZE);
    for p in particles {
        out.extend_from_slice(&p.to_bytes());
    }
    out
}
