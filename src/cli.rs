use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apidog-test")]
#[command(version)]
#[command(about = "YAML scenario / Apidog test case conversion toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert YAML scenarios to Apidog test cases
    Convert {
        /// Scenario file, or a directory converted recursively
        #[arg(short, long)]
        scenario: PathBuf,

        /// Apidog collection to resolve endpoints and references against
        /// (the scenario's own apiCollection reference if not specified)
        #[arg(short, long)]
        collection: Option<PathBuf>,

        /// Output file or directory (next to the input if not specified)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Convert an Apidog test case back to a YAML scenario
    Reverse {
        /// Test case JSON file
        #[arg(long)]
        case: PathBuf,

        /// Apidog collection used to strip parameters the endpoint already
        /// declares and to resolve reference names
        #[arg(short, long)]
        collection: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Merge converted test cases into a master collection
    Merge {
        /// Directory of converted test case JSON files
        #[arg(short, long)]
        input: PathBuf,

        /// Master collection file to merge into
        #[arg(short, long)]
        collection: PathBuf,

        /// Output file (collection updated in place if not specified)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Report OpenAPI endpoints no scenario exercises
    Compare {
        /// Path to OpenAPI file
        #[arg(short = 'a', long)]
        openapi: PathBuf,

        /// Directory of scenario files
        #[arg(short, long)]
        scenarios: PathBuf,

        /// Apidog collection used to resolve named endpoint references
        #[arg(short, long)]
        collection: Option<PathBuf>,

        /// Write the JSON report here in addition to the stdout summary
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },
}
