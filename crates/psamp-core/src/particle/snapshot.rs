// crates/psamp-core/src/particle/snapshot.rs

use crate::particle::record::Particle;

/// Cosmological/simulation metadata that travels with a particle set.
/// Copied verbatim into subsamples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cosmology {
    /// Scale factor.
    pub a: f32,
    pub boxsize: f32,
    pub omega_m: f32,
    pub h: f32,
    pub seed: u32,
}

/// One node's view of a particle ensemble at one instant.
///
/// `np_local` is the number of particles held here; `np_total` and
/// `np_average` describe the whole distributed ensemble.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub particles: Vec<Particle>,
    pub cosmology: Cosmology,
    /// Grid resolution per axis. 0 means "not a regular grid".
    pub nc: u32,
    pub np_local: u64,
    pub np_total: u64,
    pub np_average: f64,
}

impl Snapshot {
    /// A single, non-distributed snapshot: local == total == average.
    pub fn whole(particles: Vec<Particle>, cosmology: Cosmology, nc: u32) -> Self {
        let n = particles.len() as u64;
        Snapshot {
            particles,
            cosmology,
            nc,
            np_local: n,
            np_total: n,
            np_average: n as f64,
        }
    }

    /// Split into `nodes` contiguous slabs in id order, the way a
    /// domain-decomposed run would hold them. Earlier ranks take the remainder.
    pub fn partition(&self, nodes: usize) -> Vec<Snapshot> {
        let nodes = nodes.max(1);
        let n = self.particles.len();
        let chunk = n / nodes;
        let rem = n % nodes;

        let mut out = Vec::with_capacity(nodes);
        let mut start = 0usize;
        for rank in 0..nodes {
            let len = chunk + usize::from(rank < rem);
            let particles = self.particles[start..start + len].to_vec();
            start += len;
            out.push(Snapshot {
                np_local: particles.len() as u64,
                particles,
                cosmology: self.cosmology,
                nc: self.nc,
                np_total: n as u64,
                np_average: n as f64 / nodes as f64,
            });
        }
        out
    }
}
