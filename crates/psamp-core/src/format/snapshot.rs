// crates/psamp-core/src/format/snapshot.rs

use crate::error::{PsampError, Result};
use crate::format::trailer::{self, TRAILER_LEN};
use crate::particle::record::{Particle, RECORD_SIZE};
use crate::particle::snapshot::{Cosmology, Snapshot};

const MAGIC: &[u8; 4] = b"PSN1";
pub const VERSION: u16 = 1;

/// Fixed header length, magic through np.
pub const HEADER_LEN: usize = 4 + 2 + 2 + 4 * 4 + 4 + 4 + 8 + 8 + 8;

/// Binary snapshot layout (little-endian). Full and subsampled snapshots
/// share it; a subsample differs only in counts and `nc`.
///
/// MAGIC[4]
/// version:u16
/// flags:u16          (reserved, 0)
/// a:f32 boxsize:f32 omega_m:f32 h:f32
/// seed:u32
/// nc:u32
/// np_total:u64
/// np_average:f64
/// np:u64             (records in this file)
/// records[np]        (32 bytes each, see Particle::to_bytes)
/// crc32:u32          (over everything before crc32)
/// blake3_16:[16]     (over everything before blake3)
pub fn encode(s: &Snapshot) -> Vec<u8> {
    let mut b = Vec::with_capacity(HEADER_LEN + s.particles.len() * RECORD_SIZE + TRAILER_LEN);
    b.extend_from_slice(MAGIC);
    b.extend_from_slice(&VERSION.to_le_bytes());
    b.extend_from_slice(&0u16.to_le_bytes());

    let c = &s.cosmology;
    b.extend_from_slice(&c.a.to_le_bytes());
    b.extend_from_slice(&c.boxsize.to_le_bytes());
    b.extend_from_slice(&c.omega_m.to_le_bytes());
    b.extend_from_slice(&c.h.to_le_bytes());
    b.extend_from_slice(&c.seed.to_le_bytes());

    b.extend_from_slice(&s.nc.to_le_bytes());
    b.extend_from_slice(&s.np_total.to_le_bytes());
    b.extend_from_slice(&s.np_average.to_le_bytes());
    b.extend_from_slice(&(s.particles.len() as u64).to_le_bytes());

    for p in &s.particles {
        b.extend_from_slice(&p.to_bytes());
    }

    trailer::seal(&mut b);
    b
}

pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
    if bytes.len() < 4 || &bytes[0..4] != MAGIC {
        return Err(PsampError::Format("bad magic".into()));
    }
    if bytes.len() < HEADER_LEN + TRAILER_LEN {
        return Err(PsampError::Format("snapshot too small".into()));
    }
    let bytes = trailer::open(bytes)?;
    let mut i = 4usize;

    let version = read_u16(bytes, &mut i)?;
    if version != VERSION {
        return Err(PsampError::Format(format!("unsupported version {version}")));
    }
    let _flags = read_u16(bytes, &mut i)?;

    let a = read_f32(bytes, &mut i)?;
    let boxsize = read_f32(bytes, &mut i)?;
    let omega_m = read_f32(bytes, &mut i)?;
    let h = read_f32(bytes, &mut i)?;
    let seed = read_u32(bytes, &mut i)?;

    let nc = read_u32(bytes, &mut i)?;
    let np_total = read_u64(bytes, &mut i)?;
    let np_average = read_f64(bytes, &mut i)?;
    let np = read_u64(bytes, &mut i)?;

    // Size the record block before allocating anything.
    let body = bytes.len() - i;
    let np_usize = usize::try_from(np)
        .map_err(|_| PsampError::Format("particle count overflows usize".into()))?;
    if np_usize.checked_mul(RECORD_SIZE) != Some(body) {
        return Err(PsampError::Format(format!(
            "record block is {body} bytes, header says {np} particles"
        )));
    }

    let particles: Vec<Particle> = bytes[i..]
        .chunks_exact(RECORD_SIZE)
        .map(Particle::from_bytes)
        .collect();

    Ok(Snapshot {
        particles,
        cosmology: Cosmology {
            a,
            boxsize,
            omega_m,
            h,
            seed,
        },
        nc,
        np_local: np,
        np_total,
        np_average,
    })
}

/// The trailing blake3_16 of an encoded snapshot, as hex.
pub fn snapshot_id_hex(encoded: &[u8]) -> Result<String> {
    trailer::content_id(encoded)
}

fn take<'a>(bytes: &'a [u8], i: &mut usize, n: usize) -> Result<&'a [u8]> {
    if bytes.len() < *i + n {
        return Err(PsampError::Format("unexpected eof".into()));
    }
    let s = &bytes[*i..*i + n];
    *i += n;
    Ok(s)
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    let s = take(bytes, i, 2)?;
    Ok(u16::from_le_bytes([s[0], s[1]]))
}

fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32> {
    let s = take(bytes, i, 4)?;
    Ok(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

fn read_f32(bytes: &[u8], i: &mut usize) -> Result<f32> {
    Ok(f32::from_bits(read_u32(bytes, i)?))
}

fn read_u64(bytes: &[u8], i: &mut usize) -> Result<u64> {
    let s = take(bytes, i, 8)?;
    let mut a = [0u8; 8];
    a.copy_from_slice(s);
    Ok(u64::from_le_bytes(a))
}

fn read_f64(bytes: &[u8], i: &mut usize) -> Result<f64> {
    Ok(f64::from_bits(read_u64(bytes, i)?))
}
