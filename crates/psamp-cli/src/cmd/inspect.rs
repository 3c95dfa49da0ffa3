use clap::Args;
use psamp_core::format::snapshot as snapshot_format;

use crate::io::snapshot_file;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input .psn path
    #[arg(long)]
    pub r#in: String,

    /// Also print the first N particles
    #[arg(long, default_value_t = 0)]
    pub head: usize,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = snapshot_file::load_psn_bytes(&args.r#in)?;
    let s = snapshot_format::decode(&bytes)?;
    let id = snapshot_format::snapshot_id_hex(&bytes)?;

    eprintln!("--- inspect ---");
    eprintln!("file        = {}", args.r#in);
    eprintln!("snapshot_ok = true (magic + crc32 + blake3 verified)");
    eprintln!("id          = {}", id);
    eprintln!("bytes       = {}", bytes.len());
    eprintln!("--- header ---");
    eprintln!("a           = {}", s.cosmology.a);
    eprintln!("boxsize     = {}", s.cosmology.boxsize);
    eprintln!("omega_m     = {}", s.cosmology.omega_m);
    eprintln!("h           = {}", s.cosmology.h);
    eprintln!("seed        = {}", s.cosmology.seed);
    if s.nc == 0 {
        eprintln!("nc          = 0 (irregular / random subsample)");
    } else {
        eprintln!("nc          = {}", s.nc);
    }
    eprintln!("np_local    = {}", s.np_local);
    eprintln!("np_total    = {}", s.np_total);
    eprintln!("np_average  = {}", s.np_average);

    for p in s.particles.iter().take(args.head) {
        eprintln!(
            "id={} x=[{}, {}, {}] v=[{}, {}, {}]",
            p.id, p.x[0], p.x[1], p.x[2], p.v[0], p.v[1], p.v[2]
        );
    }
    Ok(())
}
