use clap::Args;
use psamp_core::defaults::{default_cosmology, lattice_snapshot};
use psamp_core::Cosmology;

use crate::io::snapshot_file;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Lattice resolution per axis (nc^3 particles)
    #[arg(long, default_value_t = 32)]
    pub nc: u32,

    /// Output .psn path
    #[arg(long)]
    pub out: String,

    /// Box size
    #[arg(long)]
    pub boxsize: Option<f32>,

    /// Scale factor
    #[arg(long)]
    pub a: Option<f32>,

    #[arg(long)]
    pub omega_m: Option<f32>,

    /// Dimensionless Hubble parameter
    #[arg(long = "hubble")]
    pub h: Option<f32>,

    /// Simulation seed recorded in the header
    #[arg(long)]
    pub seed: Option<u32>,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.nc == 0 {
        anyhow::bail!("--nc must be > 0");
    }

    let d = default_cosmology();
    let cosmology = Cosmology {
        a: args.a.unwrap_or(d.a),
        boxsize: args.boxsize.unwrap_or(d.boxsize),
        omega_m: args.omega_m.unwrap_or(d.omega_m),
        h: args.h.unwrap_or(d.h),
        seed: args.seed.unwrap_or(d.seed),
    };

    let snapshot = lattice_snapshot(args.nc, cosmology);
    let id = snapshot_file::save_psn(&args.out, &snapshot)?;

    eprintln!(
        "generate ok: out={} nc={} particles={} id={}",
        args.out,
        args.nc,
        snapshot.particles.len(),
        id
    );
    Ok(())
}
