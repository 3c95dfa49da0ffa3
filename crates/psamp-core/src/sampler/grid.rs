// crates/psamp-core/src/sampler/grid.rs

use crate::error::{PsampError, Result};

/// Regular lattice subsampling. No shot noise, no randomness.
#[derive(Clone, Copy, Debug)]
pub struct GridSelector {
    stride: u32,
}

impl GridSelector {
    pub fn new(stride: u32) -> Self {
        Self { stride }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// `id` is 1-based; `nc` is the source lattice resolution per axis.
    pub fn keep(&self, id: u64, nc: u32) -> Result<bool> {
        if id == 0 {
            return Err(PsampError::Config(
                "grid subsampling needs 1-based particle ids, found id 0".into(),
            ));
        }
        let n = id - 1;
        let nc = nc as u64;
        let s = self.stride as u64;
        let iz = n % nc;
        let iy = (n / nc) % nc;
        let ix = n / (nc * nc);
        Ok(ix % s == 0 && iy % s == 0 && iz % s == 0)
    }

    /// Resolution of the subsampled lattice.
    pub fn output_nc(&self, nc: u32) -> u32 {
        nc / self.stride
    }

    /// Particle count of a full subsampled lattice.
    pub fn expected_total(&self, nc: u32) -> u64 {
        let m = self.output_nc(nc) as u64;
        m * m * m
    }
}
