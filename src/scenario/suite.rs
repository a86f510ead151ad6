//! Scenario composition for the job cleanup policy suite
//!
//! One parameterized builder produces the policy scenario for either
//! cleanup policy; the only difference between the two variants is the
//! policy written into the engine resource and the flipped expectation
//! on the final job-pod recheck.

use colored::Colorize;

use crate::cluster::ChaosCluster;
use crate::common::ErrorCode;
use crate::context::{CleanupPolicy, TestContext};

use super::runner::{run_scenario, ScenarioResult};
use super::step::{Expectation, Phase, Step, StepKind};

/// Experiment exercised by this suite
pub const EXPERIMENT: &str = "disk-fill";

/// Label stamped on every resource the suite installs
pub const TEST_LABEL: &str = "job-cleanup-policy";

/// Build the verification pipeline for one policy variant
pub fn policy_scenario(policy: CleanupPolicy) -> Vec<Step> {
    let job_pod_check = match policy {
        CleanupPolicy::Retain => Step::new(
            Phase::Status,
            "Job pod retained after engine completion",
            StepKind::CheckJobPod,
        ),
        CleanupPolicy::Delete => Step::new(
            Phase::Status,
            "Job pod removed after engine completion",
            StepKind::CheckJobPod,
        )
        .expecting(Expectation::MustFailWith(ErrorCode::NotFound)),
    };

    vec![
        Step::new(
            Phase::PreChaos,
            "Connecting to the cluster",
            StepKind::Connect,
        ),
        Step::new(
            Phase::PreChaos,
            "Loading environment overrides",
            StepKind::LoadEnv,
        ),
        Step::new(
            Phase::Status,
            "Checking chaos operator status",
            StepKind::ControllerHealth,
        ),
        Step::new(Phase::Install, "Installing RBAC", StepKind::InstallRbac),
        Step::new(
            Phase::Install,
            "Installing chaos experiment",
            StepKind::InstallExperiment,
        ),
        Step::new(
            Phase::Install,
            "Installing chaos engine",
            StepKind::InstallEngine,
        ),
        Step::new(
            Phase::Status,
            "Runner pod running status check",
            StepKind::WaitRunnerPod,
        ),
        Step::new(
            Phase::Status,
            "Injection pod running status check",
            StepKind::WaitInjectionPod,
        ),
        Step::new(
            Phase::Status,
            "Waiting for injection completion and collecting logs",
            StepKind::InjectionLogs,
        ),
        Step::new(
            Phase::Verdict,
            "Checking the chaos result verdict",
            StepKind::Verdict,
        ),
        Step::new(
            Phase::Status,
            "Waiting for engine completion",
            StepKind::WaitEngineCompletion,
        ),
        job_pod_check,
    ]
}

/// Build the unconditional cleanup scenario
pub fn cleanup_scenario() -> Vec<Step> {
    vec![Step::new(
        Phase::Cleanup,
        "Removing chaos resources",
        StepKind::Cleanup,
    )]
}

/// Aggregated results of a suite run
#[derive(Debug)]
pub struct SuiteReport {
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    pub fn passed(&self) -> bool {
        self.failed() == 0
    }

    /// Print a per-scenario summary
    pub fn print(&self) {
        println!("\n{}", "Suite Summary:".blue().bold());
        for result in &self.results {
            if result.passed {
                println!(
                    "  {} {} ({}/{} steps)",
                    "✓".green(),
                    result.name,
                    result.steps_run,
                    result.steps_total
                );
            } else {
                println!(
                    "  {} {} ({}/{} steps): {}",
                    "✗".red(),
                    result.name,
                    result.steps_run,
                    result.steps_total,
                    result.error.as_deref().unwrap_or("unknown failure")
                );
            }
        }
    }
}

/// Run the policy scenario for each requested variant, each followed
/// unconditionally by the cleanup scenario
///
/// Cleanup runs whether or not the policy scenario passed, so a failed
/// scenario never leaks installed resources into the next one; its
/// result is reported independently.
pub async fn run_suite(
    cluster: &dyn ChaosCluster,
    policies: &[CleanupPolicy],
    verbose: bool,
) -> SuiteReport {
    let mut results = Vec::new();

    for &policy in policies {
        let name = format!("job cleanup policy '{policy}'");
        let mut ctx = TestContext::new(EXPERIMENT, TEST_LABEL, policy);
        let result = run_scenario(&name, &policy_scenario(policy), &mut ctx, cluster, verbose).await;
        results.push(result);

        let cleanup_name = format!("cleanup after '{policy}'");
        let mut cleanup_ctx = TestContext::new(EXPERIMENT, TEST_LABEL, policy);
        cleanup_ctx.load_env();
        let cleanup_result = run_scenario(
            &cleanup_name,
            &cleanup_scenario(),
            &mut cleanup_ctx,
            cluster,
            verbose,
        )
        .await;
        results.push(cleanup_result);
    }

    SuiteReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_step_order() {
        let steps = policy_scenario(CleanupPolicy::Retain);
        let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Connect,
                StepKind::LoadEnv,
                StepKind::ControllerHealth,
                StepKind::InstallRbac,
                StepKind::InstallExperiment,
                StepKind::InstallEngine,
                StepKind::WaitRunnerPod,
                StepKind::WaitInjectionPod,
                StepKind::InjectionLogs,
                StepKind::Verdict,
                StepKind::WaitEngineCompletion,
                StepKind::CheckJobPod,
            ]
        );
    }

    #[test]
    fn test_job_pod_expectation_flips_with_policy() {
        let retain = policy_scenario(CleanupPolicy::Retain);
        assert_eq!(retain.last().unwrap().expect, Expectation::MustSucceed);

        let delete = policy_scenario(CleanupPolicy::Delete);
        assert_eq!(
            delete.last().unwrap().expect,
            Expectation::MustFailWith(ErrorCode::NotFound)
        );
    }

    #[test]
    fn test_variants_differ_only_in_final_check() {
        let retain = policy_scenario(CleanupPolicy::Retain);
        let delete = policy_scenario(CleanupPolicy::Delete);
        assert_eq!(retain.len(), delete.len());
        for (r, d) in retain.iter().zip(&delete).take(retain.len() - 1) {
            assert_eq!(r.kind, d.kind);
            assert_eq!(r.expect, d.expect);
            assert_eq!(r.label, d.label);
        }
    }

    #[test]
    fn test_cleanup_scenario_is_single_step() {
        let steps = cleanup_scenario();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::Cleanup);
        assert_eq!(steps[0].phase, Phase::Cleanup);
    }
}
