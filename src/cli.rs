use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line surface. Running with no arguments performs the full setup.
#[derive(Parser, Debug)]
#[command(
    name = "setup-data",
    version,
    about = "Prepare the directory layout and data notes for the FinRL pipeline"
)]
pub struct Cli {
    /// Run as if started in this directory.
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    /// Report what setup would do without touching the filesystem.
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the pipeline directories and write data/README.md (default).
    Setup,
    /// Show which directories exist and whether data/README.md is current.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print the directories setup provisions.
    Manifest,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
