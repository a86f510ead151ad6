//! CLI command handling
//!
//! Dispatches CLI commands against the cluster seam and maps suite
//! failures to a non-zero exit.

use colored::Colorize;

use crate::cluster::{ChaosCluster, KubectlCluster};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::context::{CleanupPolicy, TestContext};
use crate::scenario;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let config = Config::load()?;
    // The spinner would interleave with per-step debug output, so it is
    // suppressed under --verbose; indicatif already hides itself when
    // stderr is not a terminal.
    let cluster = KubectlCluster::new(&config, !command.verbose())?;

    match command {
        Commands::Run { policy, verbose } => {
            let policies: Vec<CleanupPolicy> = match policy {
                Some(policy) => vec![policy],
                None => vec![CleanupPolicy::Retain, CleanupPolicy::Delete],
            };

            let report = scenario::run_suite(&cluster, &policies, verbose).await;
            report.print();

            if report.passed() {
                println!("\n{}\n", "Suite Passed".green().bold());
                Ok(())
            } else {
                println!("\n{}\n", "Suite Failed".red().bold());
                Err(Error::SuiteFailed {
                    failed: report.failed(),
                    total: report.results.len(),
                })
            }
        }

        Commands::Cleanup { verbose } => {
            let mut ctx = TestContext::new(
                scenario::EXPERIMENT,
                scenario::TEST_LABEL,
                CleanupPolicy::Retain,
            );
            ctx.load_env();

            let result = scenario::run_scenario(
                "cleanup",
                &scenario::cleanup_scenario(),
                &mut ctx,
                &cluster,
                verbose,
            )
            .await;

            if result.passed {
                Ok(())
            } else {
                Err(Error::Cleanup(
                    result.error.unwrap_or_else(|| "unknown failure".to_string()),
                ))
            }
        }

        Commands::Check { .. } => {
            let mut ctx = TestContext::new(
                scenario::EXPERIMENT,
                scenario::TEST_LABEL,
                CleanupPolicy::Retain,
            );
            ctx.load_env();

            cluster.connect().await?;
            println!("{} cluster reachable", "✓".green());
            cluster.controller_health(&ctx).await?;
            println!(
                "{} chaos operator running in namespace '{}'",
                "✓".green(),
                ctx.chaos_namespace
            );
            Ok(())
        }
    }
}
