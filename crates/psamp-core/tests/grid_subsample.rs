use std::path::Path;

use psamp_core::format::writer::MemoryWriter;
use psamp_core::sampler::grid::GridSelector;
use psamp_core::{defaults, LocalJob, PsampError, SubsampleConfig};

#[test]
fn grid_selector_decodes_x_major_ids() {
    let g = GridSelector::new(2);
    // nc = 4: id 1 is (0,0,0), id 2 is (0,0,1), id 5 is (0,1,0), id 17 is (1,0,0)
    assert!(g.keep(1, 4).unwrap());
    assert!(!g.keep(2, 4).unwrap());
    assert!(g.keep(3, 4).unwrap());
    assert!(!g.keep(5, 4).unwrap());
    assert!(g.keep(9, 4).unwrap());
    assert!(!g.keep(17, 4).unwrap());
    assert!(g.keep(33, 4).unwrap());
    assert!(g.keep(0, 4).is_err());
}

#[test]
fn grid_strategy_yields_a_full_coarser_lattice() {
    let parts = defaults::lattice_snapshot(8, defaults::default_cosmology()).partition(4);
    let results = LocalJob {
        parts: &parts,
        scratch: &[128; 4],
        config: SubsampleConfig::grid(2),
        output: Path::new("grid.psn"),
    }
    .run(|_| MemoryWriter::default())
    .unwrap();

    let report = results[0].outcome.as_ref().unwrap().clone().unwrap();
    assert_eq!(report.ns, 64);
    assert_eq!(report.nc, 4);
    assert_eq!(report.expected, 64.0);
    assert_eq!(report.per_node, vec![16, 16, 16, 16]);

    let (_, out) = &results[0].writer.written[0];
    assert_eq!(out.nc, 4);
    assert_eq!(out.np_total, 64);
    assert!(out.particles.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn grid_strategy_needs_a_regular_snapshot() {
    let mut src = defaults::lattice_snapshot(4, defaults::default_cosmology());
    src.nc = 0;
    let parts = src.partition(2);
    let results = LocalJob {
        parts: &parts,
        scratch: &[64; 2],
        config: SubsampleConfig::grid(2),
        output: Path::new("grid.psn"),
    }
    .run(|_| MemoryWriter::default())
    .unwrap();
    assert!(matches!(results[0].outcome, Err(PsampError::Config(_))));
    assert!(matches!(results[1].outcome, Err(PsampError::Config(_))));
}

#[test]
fn zero_stride_is_rejected() {
    let parts = defaults::lattice_snapshot(2, defaults::default_cosmology()).partition(1);
    let results = LocalJob {
        parts: &parts,
        scratch: &[8],
        config: SubsampleConfig::grid(0),
        output: Path::new("grid.psn"),
    }
    .run(|_| MemoryWriter::default())
    .unwrap();
    assert!(matches!(results[0].outcome, Err(PsampError::Config(_))));
}
