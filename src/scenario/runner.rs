//! Sequential fail-fast step executor

use colored::Colorize;

use crate::cluster::ChaosCluster;
use crate::common::{Error, Result};
use crate::context::TestContext;

use super::step::{Expectation, Step, StepKind};

/// Result of one scenario run
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

impl ScenarioResult {
    fn failed(name: &str, steps_run: usize, steps_total: usize, message: String) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            steps_run,
            steps_total,
            error: Some(message),
        }
    }
}

/// Execute steps strictly in order, stopping at the first step whose
/// outcome violates its expectation
pub async fn run_scenario(
    name: &str,
    steps: &[Step],
    ctx: &mut TestContext,
    cluster: &dyn ChaosCluster,
    verbose: bool,
) -> ScenarioResult {
    let steps_total = steps.len();

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        name.white().bold()
    );

    for (i, step) in steps.iter().enumerate() {
        let step_num = i + 1;

        // Progress trace before the step executes
        println!("  {} {}", step.phase.to_string().cyan(), step.label.dimmed());

        let outcome = execute(step.kind, ctx, cluster).await;
        match judge(step.expect, outcome) {
            Ok(detail) => {
                match detail {
                    Some(detail) if verbose => {
                        println!(
                            "  {} Step {}: {} ({})",
                            "✓".green(),
                            step_num,
                            step.label,
                            detail.dimmed()
                        );
                    }
                    _ => println!("  {} Step {}: {}", "✓".green(), step_num, step.label),
                }
                tracing::info!(scenario = name, step = step.label, "step passed");
            }
            Err(e) => {
                println!("  {} Step {}: {}: {}", "✗".red(), step_num, step.label, e);
                tracing::error!(scenario = name, step = step.label, error = %e, "step failed");
                return ScenarioResult::failed(
                    name,
                    step_num,
                    steps_total,
                    format!("{}: {}", step.label, e),
                );
            }
        }
    }

    println!("  {} {}", "✓".green().bold(), "Scenario Passed".green().bold());

    ScenarioResult {
        name: name.to_string(),
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    }
}

/// Dispatch a step to its collaborator operation
///
/// Returns an optional human-readable detail for verbose trace output.
async fn execute(
    kind: StepKind,
    ctx: &mut TestContext,
    cluster: &dyn ChaosCluster,
) -> Result<Option<String>> {
    match kind {
        StepKind::Connect => cluster.connect().await.map(|()| None),
        StepKind::LoadEnv => {
            ctx.load_env();
            Ok(Some(format!(
                "experiment={} chaos-ns={} app-ns={}",
                ctx.experiment_name, ctx.chaos_namespace, ctx.app_namespace
            )))
        }
        StepKind::ControllerHealth => cluster.controller_health(ctx).await.map(|()| None),
        StepKind::InstallRbac => cluster.install_rbac(ctx).await.map(|()| None),
        StepKind::InstallExperiment => cluster.install_experiment(ctx).await.map(|()| None),
        StepKind::InstallEngine => cluster
            .install_engine(ctx)
            .await
            .map(|()| Some(format!("jobCleanUpPolicy={}", ctx.cleanup_policy))),
        StepKind::WaitRunnerPod => cluster.wait_for_runner_pod(ctx).await.map(|()| None),
        StepKind::WaitInjectionPod => cluster.wait_for_injection_pod(ctx).await.map(|()| None),
        StepKind::InjectionLogs => cluster
            .injection_logs(ctx)
            .await
            .map(|logs| Some(format!("{} bytes of logs", logs.len()))),
        StepKind::Verdict => cluster.verdict(ctx).await.map(Some),
        StepKind::WaitEngineCompletion => {
            cluster.wait_for_engine_completion(ctx).await.map(|()| None)
        }
        StepKind::CheckJobPod => cluster.job_pod_exists(ctx).await.map(|()| None),
        StepKind::Cleanup => cluster.cleanup(ctx).await.map(|()| None),
    }
}

/// Evaluate a step outcome against its expectation
fn judge(expect: Expectation, outcome: Result<Option<String>>) -> Result<Option<String>> {
    match expect {
        Expectation::MustSucceed => outcome,
        Expectation::MustFailWith(code) => match outcome {
            Ok(_) => Err(Error::StepAssertion(format!(
                "expected failure with {code}, but the step succeeded"
            ))),
            Err(e) if e.code() == code => Ok(Some(format!("failed as expected: {e}"))),
            Err(e) => Err(Error::StepAssertion(format!(
                "expected failure with {code}, got {}: {e}",
                e.code()
            ))),
        },
    }
}
