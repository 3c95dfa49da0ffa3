pub mod error;
pub mod validate;

pub mod config;
pub mod defaults;
pub mod particle;
pub mod format;
pub mod sampler;
pub mod capacity;
pub mod comm;
pub mod exchange;
pub mod gather;
pub mod assemble;
pub mod pipeline;

pub use crate::config::{Strategy, SubsampleConfig};
pub use crate::error::{PsampError, Result};
pub use crate::particle::record::{Particle, RECORD_SIZE};
pub use crate::particle::snapshot::{Cosmology, Snapshot};
pub use crate::pipeline::job::{run_node, LocalJob};
pub use crate::pipeline::subsampler::{SubsampleReport, Subsampler};
pub use crate::sampler::scratch::ScratchBuffer;
