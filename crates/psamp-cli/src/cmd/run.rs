use std::path::Path;

use clap::{Args, ValueEnum};
use psamp_core::defaults::{default_cosmology, lattice_snapshot};
use psamp_core::format::snapshot as snapshot_format;
use psamp_core::format::writer::BinaryWriter;
use psamp_core::pipeline::job::root_cause;
use psamp_core::{LocalJob, Snapshot, Strategy, SubsampleConfig};

use crate::io::snapshot_file;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Keep each particle with probability --factor.
    Random,
    /// Keep every --stride-th lattice site per axis (no shot noise).
    Grid,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input snapshot (.psn). If omitted, a lattice of --nc^3 particles is used.
    #[arg(long)]
    pub r#in: Option<String>,

    /// Lattice resolution when --in is not given
    #[arg(long, default_value_t = 32)]
    pub nc: u32,

    /// Number of in-process nodes the snapshot is split across
    #[arg(long, default_value_t = 4)]
    pub nodes: usize,

    #[arg(long, value_enum, default_value_t = StrategyArg::Random)]
    pub strategy: StrategyArg,

    /// Subsampling probability in (0, 1] (random strategy)
    #[arg(long, default_value_t = 0.01)]
    pub factor: f64,

    /// Per-axis stride (grid strategy)
    #[arg(long, default_value_t = 2)]
    pub stride: u32,

    /// Global seed; every node derives its own stream from it
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Scratch capacity per node, in records.
    /// Defaults to each node's particle count.
    #[arg(long)]
    pub scratch: Option<usize>,

    /// Output .psn path (written by the coordinator only)
    #[arg(long)]
    pub out: String,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    if args.nodes == 0 {
        anyhow::bail!("--nodes must be > 0");
    }

    let source: Snapshot = match args.r#in.as_deref() {
        Some(p) => snapshot_file::load_psn(p)?,
        None => lattice_snapshot(args.nc, default_cosmology()),
    };

    let config = SubsampleConfig {
        strategy: match args.strategy {
            StrategyArg::Random => Strategy::Random {
                factor: args.factor,
            },
            StrategyArg::Grid => Strategy::Grid {
                stride: args.stride,
            },
        },
        seed: args.seed,
    };

    let parts = source.partition(args.nodes);
    let scratch: Vec<usize> = parts
        .iter()
        .map(|p| args.scratch.unwrap_or(p.particles.len()))
        .collect();

    let results = LocalJob {
        parts: &parts,
        scratch: &scratch,
        config,
        output: Path::new(&args.out),
    }
    .run(|_| BinaryWriter)?;

    let outcomes: Vec<_> = results.into_iter().map(|r| r.outcome).collect();
    if let Some(cause) = root_cause(&outcomes) {
        anyhow::bail!("subsampling job aborted (code {}): {}", cause.code(), cause);
    }

    let report = outcomes
        .into_iter()
        .next()
        .and_then(|o| o.ok().flatten())
        .ok_or_else(|| anyhow::anyhow!("coordinator produced no report"))?;

    let written = snapshot_file::load_psn_bytes(&args.out)?;
    let id = snapshot_format::snapshot_id_hex(&written)?;

    eprintln!(
        "run ok: in_particles={} nodes={} ns={} expected={:.2} per_node={:?} nc={} out={} id={}",
        source.particles.len(),
        report.nodes,
        report.ns,
        report.expected,
        report.per_node,
        report.nc,
        args.out,
        id
    );
    Ok(())
}
