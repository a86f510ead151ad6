//! CLI command definitions
//!
//! Defines the clap commands for the validation harness.

use clap::Subcommand;

use crate::context::CleanupPolicy;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the job cleanup policy suite
    Run {
        /// Run only one policy variant instead of both
        #[arg(long, value_enum)]
        policy: Option<CleanupPolicy>,

        /// Verbose output (step details, injection logs at debug level)
        #[arg(long, short)]
        verbose: bool,
    },

    /// Remove every resource the suite installs
    Cleanup {
        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Probe cluster connectivity and chaos operator health
    Check {
        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Run { verbose, .. }
            | Commands::Cleanup { verbose }
            | Commands::Check { verbose } => *verbose,
        }
    }
}
