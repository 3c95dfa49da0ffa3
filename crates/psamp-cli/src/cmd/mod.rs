// crates/psamp-cli/src/cmd/mod.rs

pub mod generate;
pub mod inspect;
pub mod run;
