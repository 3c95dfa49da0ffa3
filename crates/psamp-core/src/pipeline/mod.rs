pub mod job;
pub mod subsampler;
