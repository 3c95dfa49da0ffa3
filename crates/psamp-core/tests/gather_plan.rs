use psamp_core::exchange::GatherPlan;
use psamp_core::RECORD_SIZE;

#[test]
fn offsets_are_exclusive_prefix_sums_in_bytes() {
    let counts = [3u64, 0, 5, 2];
    let plan = GatherPlan::from_counts(&counts).unwrap();

    assert_eq!(plan.total, 10);
    assert_eq!(plan.counts, vec![3 * RECORD_SIZE, 0, 5 * RECORD_SIZE, 2 * RECORD_SIZE]);
    assert_eq!(plan.offsets, vec![0, 3 * RECORD_SIZE, 3 * RECORD_SIZE, 8 * RECORD_SIZE]);

    let last = counts.len() - 1;
    assert_eq!(plan.offsets[last] + plan.counts[last], plan.total_bytes());
}

#[test]
fn zero_counts_keep_their_slot() {
    let plan = GatherPlan::from_counts(&[0, 0, 4, 0]).unwrap();
    assert_eq!(plan.offsets, vec![0, 0, 0, 4 * RECORD_SIZE]);
    assert_eq!(plan.total, 4);
}

#[test]
fn total_is_the_sum_of_counts() {
    let counts: Vec<u64> = (0..64).map(|i| (i * 37 % 11) as u64).collect();
    let plan = GatherPlan::from_counts(&counts).unwrap();
    assert_eq!(plan.total as u64, counts.iter().sum::<u64>());
    for i in 0..counts.len() {
        let before: u64 = counts[..i].iter().sum();
        assert_eq!(plan.offsets[i], before as usize * RECORD_SIZE);
    }
}

#[test]
fn overflowing_counts_are_rejected() {
    assert!(GatherPlan::from_counts(&[u64::MAX, 1]).is_err());
}
