// crates/psamp-core/src/defaults.rs

use crate::particle::record::Particle;
use crate::particle::snapshot::{Cosmology, Snapshot};

pub fn default_cosmology() -> Cosmology {
    Cosmology {
        a: 1.0,
        boxsize: 500.0,
        omega_m: 0.273,
        h: 0.705,
        seed: 100,
    }
}

/// Small deterministic velocity in [-0.5, 0.5) per axis, derived from the id.
#[inline]
fn lattice_velocity(id: u64, axis: u64) -> f32 {
    let h = id.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17 + 11 * axis as u32);
    (h % 1000) as f32 / 1000.0 - 0.5
}

/// Full `nc`^3 lattice, one particle per cell centre, ids 1..=nc^3 in
/// x-major order (id = 1 + ix*nc*nc + iy*nc + iz).
pub fn lattice_snapshot(nc: u32, cosmology: Cosmology) -> Snapshot {
    let n = nc as u64;
    let cell = if nc == 0 { 0.0 } else { cosmology.boxsize / nc as f32 };
    let mut particles = Vec::with_capacity((n * n * n) as usize);
    for ix in 0..n {
        for iy in 0..n {
            for iz in 0..n {
                let id = 1 + ix * n * n + iy * n + iz;
                particles.push(Particle {
                    x: [
                        (ix as f32 + 0.5) * cell,
                        (iy as f32 + 0.5) * cell,
                        (iz as f32 + 0.5) * cell,
                    ],
                    v: [
                        lattice_velocity(id, 0),
                        lattice_velocity(id, 1),
                        lattice_velocity(id, 2),
                    ],
                    id,
                });
            }
        }
    }
    Snapshot::whole(particles, cosmology, nc)
}
