use std::path::Path;

use psamp_core::comm::{Communicator, LocalCluster, SoloComm};
use psamp_core::error::{CapacityError, PsampError};
use psamp_core::exchange::exchange_counts;
use psamp_core::format::writer::MemoryWriter;
use psamp_core::gather::gather;
use psamp_core::{defaults, Particle, ScratchBuffer, Subsampler, SubsampleConfig, RECORD_SIZE};

fn p(id: u64) -> Particle {
    Particle {
        x: [id as f32; 3],
        v: [-(id as f32); 3],
        id,
    }
}

#[test]
fn local_sample_occupies_the_head_and_tail_follows_it() {
    let mut s = ScratchBuffer::with_capacity(10).unwrap();
    for id in 1..=3 {
        s.push(&p(id)).unwrap();
    }
    let (head, tail) = s.split_head_tail();
    assert_eq!(head.len(), 3 * RECORD_SIZE);
    assert_eq!(tail.len(), 7 * RECORD_SIZE);
    assert_eq!(Particle::from_bytes(&head[2 * RECORD_SIZE..]), p(3));
}

#[test]
fn push_refuses_to_run_past_capacity() {
    let mut s = ScratchBuffer::with_capacity(2).unwrap();
    s.push(&p(1)).unwrap();
    s.push(&p(2)).unwrap();
    assert_eq!(s.push(&p(3)), Err(CapacityError::Overflow { capacity: 2 }));
    assert_eq!(s.len(), 2);
}

#[test]
fn capacity_that_overflows_bytes_is_rejected() {
    match ScratchBuffer::with_capacity(usize::MAX / 16) {
        Err(PsampError::Config(msg)) => assert!(msg.contains("overflows"), "{msg}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn partial_trailing_record_is_not_capacity() {
    let s = ScratchBuffer::from_bytes(vec![0u8; 3 * RECORD_SIZE + 7]);
    assert_eq!(s.capacity(), 3);
}

#[test]
fn single_node_consolidates_right_after_its_own_sample() {
    let src = defaults::lattice_snapshot(6, defaults::default_cosmology());
    let mut scratch = ScratchBuffer::with_capacity(src.particles.len()).unwrap();
    let mut writer = MemoryWriter::default();

    let mut sub = Subsampler::init(SubsampleConfig::random(0.25, 3), 0).unwrap();
    let report = sub
        .write_random_subsample(Path::new("solo.psn"), &src, &mut scratch, &SoloComm, &mut writer)
        .unwrap()
        .unwrap();
    sub.finalize();

    let local = scratch.sample();
    assert_eq!(report.nsub_local, local.len());
    assert_eq!(report.ns, local.len());

    // Consolidated copy sits immediately after the head, byte for byte.
    assert_eq!(scratch.tail_bytes(report.ns), scratch.sample_bytes());
    assert_eq!(writer.written[0].1.particles, local);
}

#[test]
fn write_random_subsample_rejects_grid_config() {
    let src = defaults::lattice_snapshot(2, defaults::default_cosmology());
    let mut scratch = ScratchBuffer::with_capacity(8).unwrap();
    let mut writer = MemoryWriter::default();
    let mut sub = Subsampler::init(SubsampleConfig::grid(2), 0).unwrap();
    let r = sub.write_random_subsample(Path::new("x"), &src, &mut scratch, &SoloComm, &mut writer);
    assert!(r.is_err());
    assert!(writer.written.is_empty());
}

#[test]
fn coordinator_head_survives_a_multi_rank_gather() {
    let out = LocalCluster::run(3, |comm| {
        let rank = comm.rank() as u64;
        let mut scratch = ScratchBuffer::with_capacity(16).unwrap();
        for k in 0..rank + 2 {
            scratch.push(&p(100 * rank + k + 1)).unwrap();
        }
        let head_before = scratch.sample_bytes().to_vec();
        let base = scratch.sample_bytes().as_ptr() as usize;
        let nsub = scratch.len();

        let plan = exchange_counts(&comm, nsub).unwrap();
        let set = gather(&comm, &mut scratch, plan.as_ref()).unwrap()?;
        let tail_offset = set.bytes().as_ptr() as usize - base;
        let consolidated = set.particles();

        assert_eq!(scratch.sample_bytes(), &head_before[..]);
        Some((nsub, tail_offset, consolidated))
    });

    assert!(out[1..].iter().all(Option::is_none));
    let (nsub, tail_offset, consolidated) = out[0].clone().unwrap();
    assert_eq!(nsub, 2);
    assert_eq!(tail_offset, nsub * RECORD_SIZE);

    let ids: Vec<u64> = consolidated.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 2, 101, 102, 103, 201, 202, 203, 204]);
    assert_eq!(consolidated[0], p(1));
}
