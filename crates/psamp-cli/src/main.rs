// crates/psamp-cli/src/main.rs

use clap::{ArgAction, Parser, Subcommand};

mod cmd;
mod io;
mod logging;

#[derive(Parser)]
#[command(name = "psamp")]
#[command(about = "Distributed particle snapshot subsampling", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a full lattice snapshot (.psn)
    Generate(cmd::generate::GenerateArgs),

    /// Subsample a snapshot across in-process nodes and write the result on the coordinator
    Run(cmd::run::RunArgs),

    /// Inspect a snapshot (.psn): header, counts, content id
    Inspect(cmd::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.cmd {
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Run(args) => cmd::run::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
    }
}
