// crates/psamp-core/src/capacity.rs

use crate::error::CapacityError;

/// Standard deviations of headroom above the expected sample size.
pub const SIGMA_MARGIN: f64 = 5.0;

/// Before sampling: can `nbuf` records hold a Bernoulli(`factor`) sample of
/// `np_local` particles with 5σ to spare? Equality passes.
pub fn check_local(factor: f64, np_local: u64, nbuf: usize) -> Result<(), CapacityError> {
    let expected = factor * np_local as f64;
    let margin = SIGMA_MARGIN * expected.sqrt();
    if expected + margin > nbuf as f64 {
        return Err(CapacityError::Local {
            expected,
            margin,
            available: nbuf,
        });
    }
    Ok(())
}

/// Coordinator, after the count exchange: the consolidated set lands right
/// after the local sample in the same buffer, so both must fit together.
pub fn check_global(nsub_local: usize, ns_total: usize, nbuf: usize) -> Result<(), CapacityError> {
    let fits = nsub_local
        .checked_add(ns_total)
        .is_some_and(|need| need <= nbuf);
    if !fits {
        return Err(CapacityError::Global {
            local: nsub_local,
            total: ns_total,
            available: nbuf,
        });
    }
    Ok(())
}
