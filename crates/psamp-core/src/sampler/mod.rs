// crates/psamp-core/src/sampler/mod.rs

pub mod grid;
pub mod random;
pub mod scratch;

use crate::config::{Strategy, SubsampleConfig};
use crate::error::Result;
use crate::particle::record::Particle;
use crate::sampler::grid::GridSelector;
use crate::sampler::random::RandomSelector;
use crate::sampler::scratch::ScratchBuffer;
use crate::validate::{validate_config, validate_grid_snapshot};

#[derive(Debug)]
enum Selector {
    Random(RandomSelector),
    Grid(GridSelector),
}

/// Per-node particle filter. Owns its random stream; dropping it releases
/// the stream.
#[derive(Debug)]
pub struct Sampler {
    selector: Selector,
    rank: usize,
}

impl Sampler {
    pub fn new(config: &SubsampleConfig, rank: usize) -> Result<Self> {
        validate_config(config)?;
        let selector = match config.strategy {
            Strategy::Random { factor } => {
                Selector::Random(RandomSelector::new(factor, config.seed, rank))
            }
            Strategy::Grid { stride } => Selector::Grid(GridSelector::new(stride)),
        };
        Ok(Self { selector, rank })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Subsampling probability, if this is a random sampler.
    pub fn factor(&self) -> Option<f64> {
        match &self.selector {
            Selector::Random(r) => Some(r.factor()),
            Selector::Grid(_) => None,
        }
    }

    pub fn grid(&self) -> Option<GridSelector> {
        match &self.selector {
            Selector::Random(_) => None,
            Selector::Grid(g) => Some(*g),
        }
    }

    /// `nc` recorded on the consolidated snapshot: 0 for random subsamples.
    pub fn output_nc(&self, source_nc: u32) -> u32 {
        match &self.selector {
            Selector::Random(_) => 0,
            Selector::Grid(g) => g.output_nc(source_nc),
        }
    }

    /// Stable filter of `particles` into the head of `out`. Returns `nsub`.
    ///
    /// The random sampler draws exactly one value per particle regardless of
    /// the outcome, so the stream position depends only on the input length.
    pub fn filter(
        &mut self,
        particles: &[Particle],
        nc: u32,
        out: &mut ScratchBuffer,
    ) -> Result<usize> {
        out.clear();
        match &mut self.selector {
            Selector::Random(r) => {
                for p in particles {
                    if r.keep() {
                        out.push(p)?;
                    }
                }
            }
            Selector::Grid(g) => {
                validate_grid_snapshot(nc)?;
                for p in particles {
                    if g.keep(p.id, nc)? {
                        out.push(p)?;
                    }
                }
            }
        }
        Ok(out.len())
    }
}
