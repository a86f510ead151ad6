//! chaos-e2e - end-to-end validation harness for chaos-engine job
//! cleanup policies
//!
//! Drives ordered, fail-fast verification scenarios against a cluster
//! running the chaos control plane and reports pass/fail per scenario.

use chaos_e2e::{cli, commands::Commands, common::logging};
use clap::Parser;

#[derive(Parser)]
#[command(name = "chaos-e2e", about = "Chaos-engine job cleanup policy validation harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.command.verbose());

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
