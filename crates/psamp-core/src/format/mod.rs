pub mod snapshot;
pub mod trailer;
pub mod writer;
