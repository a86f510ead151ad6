//! End-to-end suite behavior against the in-memory cluster fake

mod common;

use chaos_e2e::scenario::{cleanup_scenario, policy_scenario, run_scenario, run_suite};
use chaos_e2e::{CleanupPolicy, Error, TestContext};
use common::FakeCluster;

fn ctx(policy: CleanupPolicy) -> TestContext {
    TestContext::new("disk-fill", "job-cleanup-policy", policy)
}

const FULL_CALL_ORDER: &[&str] = &[
    "connect",
    "controller_health",
    "install_rbac",
    "install_experiment",
    "install_engine",
    "wait_for_runner_pod",
    "wait_for_injection_pod",
    "injection_logs",
    "verdict",
    "wait_for_engine_completion",
    "job_pod_exists",
];

#[tokio::test]
async fn retain_scenario_passes_end_to_end() {
    let cluster = FakeCluster::new();
    let steps = policy_scenario(CleanupPolicy::Retain);
    let mut ctx = ctx(CleanupPolicy::Retain);

    let result = run_scenario("retain", &steps, &mut ctx, &cluster, false).await;

    assert!(result.passed, "error: {:?}", result.error);
    assert_eq!(result.steps_run, steps.len());
    assert_eq!(cluster.calls(), FULL_CALL_ORDER);
}

#[tokio::test]
async fn delete_scenario_passes_when_job_pod_absent() {
    let cluster = FakeCluster::new();
    let steps = policy_scenario(CleanupPolicy::Delete);
    let mut ctx = ctx(CleanupPolicy::Delete);

    let result = run_scenario("delete", &steps, &mut ctx, &cluster, false).await;

    // The fake removes the job pod after engine completion under
    // 'delete', so the final must-fail check is the expected outcome
    assert!(result.passed, "error: {:?}", result.error);
    assert_eq!(cluster.calls(), FULL_CALL_ORDER);
}

#[tokio::test]
async fn engine_install_failure_halts_before_pod_checks() {
    let cluster = FakeCluster::new();
    cluster.fail_on("install_engine", || {
        Error::install("chaos engine", "malformed jobCleanUpPolicy")
    });

    let steps = policy_scenario(CleanupPolicy::Retain);
    let mut ctx = ctx(CleanupPolicy::Retain);
    let result = run_scenario("retain", &steps, &mut ctx, &cluster, false).await;

    assert!(!result.passed);
    assert_eq!(result.steps_run, 6);
    assert_eq!(result.steps_total, steps.len());

    let message = result.error.unwrap();
    assert!(message.contains("Installing chaos engine"), "{message}");
    assert!(message.contains("malformed jobCleanUpPolicy"), "{message}");

    // No pod-status step ran after the failed install
    assert!(!cluster.calls().contains(&"wait_for_runner_pod"));
    assert!(!cluster.calls().contains(&"job_pod_exists"));
}

#[tokio::test]
async fn delete_scenario_rejects_non_notfound_failure() {
    let cluster = FakeCluster::new();
    // A timeout on the listing is not evidence that the pod is absent
    cluster.fail_on("job_pod_exists", || Error::timeout("job pod listing", 30));

    let steps = policy_scenario(CleanupPolicy::Delete);
    let mut ctx = ctx(CleanupPolicy::Delete);
    let result = run_scenario("delete", &steps, &mut ctx, &cluster, false).await;

    assert!(!result.passed);
    let message = result.error.unwrap();
    assert!(message.contains("NOT_FOUND"), "{message}");
    assert!(message.contains("TIMEOUT"), "{message}");
}

#[tokio::test]
async fn cleanup_runs_after_failed_scenario() {
    let cluster = FakeCluster::new();
    cluster.fail_on("wait_for_runner_pod", || Error::timeout("runner pod", 180));

    let report = run_suite(&cluster, &[CleanupPolicy::Retain], false).await;

    assert_eq!(report.results.len(), 2);
    assert!(!report.results[0].passed);
    assert!(report.results[1].passed, "cleanup must run and pass");
    assert!(cluster.calls().contains(&"cleanup"));
    assert!(cluster.installed().is_empty());
    assert!(!report.passed());
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn cleanup_failure_leaves_prior_verdict_intact() {
    let cluster = FakeCluster::new();
    cluster.fail_on("cleanup", || {
        Error::Cleanup("chaosengine deletion denied".into())
    });

    let report = run_suite(&cluster, &[CleanupPolicy::Retain], false).await;

    assert_eq!(report.results.len(), 2);
    assert!(
        report.results[0].passed,
        "a failing cleanup must not overturn the policy scenario's verdict"
    );
    assert!(!report.results[1].passed);
    assert_eq!(report.failed(), 1);

    let message = report.results[1].error.as_deref().unwrap();
    assert!(message.contains("chaosengine deletion denied"), "{message}");
}

#[tokio::test]
async fn cleanup_is_idempotent() {
    let cluster = FakeCluster::new();
    let mut ctx = ctx(CleanupPolicy::Retain);
    let steps = cleanup_scenario();

    let first = run_scenario("cleanup", &steps, &mut ctx, &cluster, false).await;
    let second = run_scenario("cleanup", &steps, &mut ctx, &cluster, false).await;

    assert!(first.passed);
    assert!(second.passed, "second cleanup must be a no-op, not an error");
}

#[tokio::test]
async fn full_suite_runs_both_policies_with_interleaved_cleanup() {
    let cluster = FakeCluster::new();

    let report = run_suite(
        &cluster,
        &[CleanupPolicy::Retain, CleanupPolicy::Delete],
        false,
    )
    .await;

    assert!(report.passed(), "results: {:?}", report.results);
    assert_eq!(report.results.len(), 4);
    assert_eq!(report.results[0].name, "job cleanup policy 'retain'");
    assert_eq!(report.results[1].name, "cleanup after 'retain'");
    assert_eq!(report.results[2].name, "job cleanup policy 'delete'");
    assert_eq!(report.results[3].name, "cleanup after 'delete'");

    // Nothing left behind after the final cleanup
    assert!(cluster.installed().is_empty());

    // Each policy scenario installed the engine before checking pods
    let calls = cluster.calls();
    assert_eq!(calls.iter().filter(|c| **c == "install_engine").count(), 2);
    assert_eq!(calls.iter().filter(|c| **c == "cleanup").count(), 2);
}
