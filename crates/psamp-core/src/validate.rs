use crate::config::{Strategy, SubsampleConfig};
use crate::error::{PsampError, Result};

pub fn validate_config(c: &SubsampleConfig) -> Result<()> {
    match c.strategy {
        Strategy::Random { factor } => {
            // NaN fails both comparisons, so it lands here too.
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(PsampError::Config(format!(
                    "subsample factor must be in (0, 1], got {factor}"
                )));
            }
        }
        Strategy::Grid { stride } => {
            if stride == 0 {
                return Err(PsampError::Config("grid stride must be non-zero".into()));
            }
        }
    }
    Ok(())
}

/// Grid sampling decodes lattice indices from ids, so the snapshot must be a grid.
pub fn validate_grid_snapshot(nc: u32) -> Result<()> {
    if nc == 0 {
        return Err(PsampError::Config(
            "grid subsampling needs a regular snapshot (nc > 0)".into(),
        ));
    }
    Ok(())
}
