use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

mod commands;

use commands::bridges::{self, BridgeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "waterbridge",
    about = "Find residue pairs of two domains that interact through a single bridging water.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input PDB file. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Object name used in residue labels (default: HEADER id or file stem).
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
    /// Extra residue names to treat as water.
    #[arg(long = "water-alias", value_name = "RES_NAME")]
    water_aliases: Vec<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Decrease log verbosity (-q errors only, -qq silent).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
    #[command(flatten)]
    bridges: BridgeArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose, cli.quiet);

    let structure =
        commands::load_input(cli.input.as_deref(), cli.name.as_deref(), &cli.water_aliases)?;
    bridges::run(&structure, &cli.bridges)
}
