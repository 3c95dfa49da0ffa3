// crates/psamp-core/src/pipeline/subsampler.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::capacity::{check_global, check_local};
use crate::comm::Communicator;
use crate::config::{Strategy, SubsampleConfig};
use crate::error::{PsampError, Result};
use crate::exchange::exchange_counts;
use crate::format::writer::SnapshotWriter;
use crate::gather::gather;
use crate::particle::snapshot::Snapshot;
use crate::sampler::scratch::ScratchBuffer;
use crate::sampler::Sampler;

/// What the coordinator wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct SubsampleReport {
    pub path: PathBuf,
    pub nodes: usize,
    /// Coordinator's own local sample.
    pub nsub_local: usize,
    /// Consolidated count written.
    pub ns: usize,
    /// Per-rank sample counts, in rank order.
    pub per_node: Vec<u64>,
    /// `factor * np_total` for random sampling, `(nc/stride)^3` for grid.
    pub expected: f64,
    pub nc: u32,
}

/// One rank's subsampling state between `init` and `finalize`.
#[derive(Debug)]
pub struct Subsampler {
    config: SubsampleConfig,
    sampler: Sampler,
}

impl Subsampler {
    /// Validate `config` and seed this rank's stream. Every rank must pass
    /// the same config.
    pub fn init(config: SubsampleConfig, rank: usize) -> Result<Self> {
        let sampler = Sampler::new(&config, rank)?;
        match config.strategy {
            Strategy::Random { factor } => info!(
                rank,
                factor,
                seed = config.seed.wrapping_mul(2),
                "subsampling initialized"
            ),
            Strategy::Grid { stride } => info!(rank, stride, "grid subsampling initialized"),
        }
        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &SubsampleConfig {
        &self.config
    }

    /// Release the random stream.
    pub fn finalize(self) {
        debug!(rank = self.sampler.rank(), "subsampling finalized");
    }

    /// Random subsample of a distributed snapshot, written by the coordinator.
    pub fn write_random_subsample<C, W>(
        &mut self,
        filename: &Path,
        snapshot: &Snapshot,
        scratch: &mut ScratchBuffer,
        comm: &C,
        writer: &mut W,
    ) -> Result<Option<SubsampleReport>>
    where
        C: Communicator + ?Sized,
        W: SnapshotWriter + ?Sized,
    {
        if self.sampler.factor().is_none() {
            return Err(PsampError::Config(
                "write_random_subsample needs a random sampling strategy".into(),
            ));
        }
        self.write_subsample(filename, snapshot, scratch, comm, writer)
    }

    /// Filter locally, exchange counts, gather onto the coordinator, and write
    /// there. Returns the report on the coordinator and `None` elsewhere.
    ///
    /// Must be called by every rank; both collectives inside are barriers.
    pub fn write_subsample<C, W>(
        &mut self,
        filename: &Path,
        snapshot: &Snapshot,
        scratch: &mut ScratchBuffer,
        comm: &C,
        writer: &mut W,
    ) -> Result<Option<SubsampleReport>>
    where
        C: Communicator + ?Sized,
        W: SnapshotWriter + ?Sized,
    {
        let rank = comm.rank();
        let np = snapshot.particles.len();
        let nbuf = scratch.capacity();

        if let Some(factor) = self.sampler.factor() {
            check_local(factor, np as u64, nbuf)?;
        }

        let nsub = self.sampler.filter(&snapshot.particles, snapshot.nc, scratch)?;
        debug!(rank, np, nsub, nbuf, "local sample drawn");

        let plan = exchange_counts(comm, nsub)?;

        let expected = match self.config.strategy {
            Strategy::Random { factor } => factor * snapshot.np_total as f64,
            Strategy::Grid { .. } => self
                .sampler
                .grid()
                .map_or(0.0, |g| g.expected_total(snapshot.nc) as f64),
        };

        if let Some(plan) = &plan {
            check_global(nsub, plan.total, nbuf)?;
            info!(ns = plan.total, expected, "subsampled particles");

            if let Some(g) = self.sampler.grid() {
                let exact = snapshot.nc % g.stride() == 0;
                if exact && plan.total as u64 != g.expected_total(snapshot.nc) {
                    warn!(
                        ns = plan.total,
                        expected = g.expected_total(snapshot.nc),
                        "grid subsample is not a full lattice"
                    );
                }
            }
        }

        let Some(set) = gather(comm, scratch, plan.as_ref())? else {
            return Ok(None);
        };
        let nc = self.sampler.output_nc(snapshot.nc);
        let out = assemble(snapshot, &set, nc);
        writer.write(filename, &out)?;
        info!(path = %filename.display(), ns = set.len(), nc, "subsample written");

        let per_node = plan.map(|p| p.nsub).unwrap_or_default();
        Ok(Some(SubsampleReport {
            path: filename.to_path_buf(),
            nodes: comm.size(),
            nsub_local: nsub,
            ns: set.len(),
            per_node,
            expected,
            nc,
        }))
    }
}
