// crates/psamp-core/src/sampler/random.rs

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Per-node stream seed. Ranks are 100 apart and the global seed is doubled,
/// so neighbouring ranks and seeds never share a stream.
pub fn node_seed(global_seed: u64, rank: usize) -> u64 {
    global_seed
        .wrapping_mul(2)
        .wrapping_add((rank as u64).wrapping_mul(100))
}

/// Rejection filter: one uniform draw per particle, keep iff `u < factor`.
/// The stream is ChaCha20 and must stay bit-identical for a given seed.
#[derive(Debug)]
pub struct RandomSelector {
    rng: ChaCha20Rng,
    factor: f64,
}

impl RandomSelector {
    pub fn new(factor: f64, global_seed: u64, rank: usize) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(node_seed(global_seed, rank)),
            factor,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    #[inline]
    pub fn keep(&mut self) -> bool {
        let u: f64 = self.rng.gen();
        u < self.factor
    }
}
