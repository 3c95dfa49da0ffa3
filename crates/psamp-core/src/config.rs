// crates/psamp-core/src/config.rs

/// How particles are picked on each node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    /// Keep each particle independently with probability `factor` in (0, 1].
    Random { factor: f64 },
    /// Keep every `stride`-th lattice site per axis. Needs ids laid out on an
    /// `nc`^3 grid (id = 1 + ix*nc*nc + iy*nc + iz).
    Grid { stride: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubsampleConfig {
    pub strategy: Strategy,
    /// Global seed; every rank must pass the same value.
    pub seed: u64,
}

impl SubsampleConfig {
    pub fn random(factor: f64, seed: u64) -> Self {
        Self {
            strategy: Strategy::Random { factor },
            seed,
        }
    }

    pub fn grid(stride: u32) -> Self {
        Self {
            strategy: Strategy::Grid { stride },
            seed: 0,
        }
    }
}
