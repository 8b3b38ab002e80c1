use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "routemap")]
#[command(about = "Discover HTTP routes and declarations in a repository", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the language and web framework of a local directory
    Detect {
        /// Directory to inspect
        path: PathBuf,
    },

    /// Extract HTTP routes from a local directory or a repository URL
    Routes {
        /// Local directory, or repository URL to clone
        source: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of files to scan
        #[arg(long = "max-files")]
        max_files: Option<usize>,

        /// Clone only this branch
        #[arg(long)]
        branch: Option<String>,
    },

    /// Extract models, controllers and types from a JS/TS codebase
    Declarations {
        /// Local directory, or repository URL to clone
        source: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
