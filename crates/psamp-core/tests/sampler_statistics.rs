use psamp_core::sampler::Sampler;
use psamp_core::{Particle, ScratchBuffer, SubsampleConfig};

#[test]
fn sample_count_has_binomial_mean_and_variance() {
    let n = 1_000usize;
    let f = 0.1;
    let trials = 2_000u64;

    let ps = vec![
        Particle {
            x: [0.0; 3],
            v: [0.0; 3],
            id: 1,
        };
        n
    ];
    let mut scratch = ScratchBuffer::with_capacity(n).unwrap();

    let counts: Vec<f64> = (0..trials)
        .map(|seed| {
            let mut s = Sampler::new(&SubsampleConfig::random(f, seed), 0).unwrap();
            s.filter(&ps, 0, &mut scratch).unwrap() as f64
        })
        .collect();

    let mean = counts.iter().sum::<f64>() / trials as f64;
    let var = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (trials - 1) as f64;

    let want_mean = f * n as f64;
    let want_var = f * (1.0 - f) * n as f64;

    // Standard error of the mean is ~0.21 here, of the variance ~2.9.
    assert!((mean - want_mean).abs() < 1.5, "mean {mean} vs {want_mean}");
    assert!((var - want_var).abs() < 15.0, "variance {var} vs {want_var}");
}
