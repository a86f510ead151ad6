//! Per-scenario test context
//!
//! A [`TestContext`] is created fresh for each scenario, populated from
//! the process environment by the env-load step, and discarded when the
//! scenario ends. The cleanup policy is a scenario parameter and is
//! never read from the environment.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::common::Error;

/// Post-completion disposal policy for the chaos job resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CleanupPolicy {
    /// Keep the job pod after the engine completes
    Retain,
    /// Remove the job pod after the engine completes
    Delete,
}

impl CleanupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupPolicy::Retain => "retain",
            CleanupPolicy::Delete => "delete",
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retain" => Ok(CleanupPolicy::Retain),
            "delete" => Ok(CleanupPolicy::Delete),
            other => Err(Error::Config(format!(
                "Invalid cleanup policy '{other}'. Expected 'retain' or 'delete'"
            ))),
        }
    }
}

/// Configuration for one scenario run
#[derive(Debug, Clone)]
pub struct TestContext {
    /// Chaos experiment under test (e.g. "disk-fill")
    pub experiment_name: String,
    /// Name of the chaos engine resource to install
    pub engine_name: String,
    /// Label identifying this test in installed resources
    pub test_label: String,
    /// Namespace the chaos control plane runs in
    pub chaos_namespace: String,
    /// Namespace of the target application
    pub app_namespace: String,
    /// Label selector for the target application
    pub app_label: String,
    /// Cleanup policy carried into the engine resource
    pub cleanup_policy: CleanupPolicy,
}

impl TestContext {
    /// Create a context with litmus-style defaults for the given
    /// experiment and policy variant
    pub fn new(experiment: &str, test_label: &str, policy: CleanupPolicy) -> Self {
        Self {
            experiment_name: experiment.to_string(),
            engine_name: format!("{test_label}-engine"),
            test_label: test_label.to_string(),
            chaos_namespace: "litmus".to_string(),
            app_namespace: "default".to_string(),
            app_label: "run=nginx".to_string(),
            cleanup_policy: policy,
        }
    }

    /// Populate env-derived fields from the process environment
    pub fn load_env(&mut self) {
        self.load_env_from(|key| std::env::var(key).ok());
    }

    /// Populate env-derived fields through an injectable lookup
    ///
    /// Unset or empty variables leave the current value in place. The
    /// cleanup policy is deliberately not environment-overridable.
    pub fn load_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let mut set = |key: &str, field: &mut String| {
            if let Some(value) = lookup(key) {
                if !value.is_empty() {
                    *field = value;
                }
            }
        };
        set("EXPERIMENT_NAME", &mut self.experiment_name);
        set("ENGINE_NAME", &mut self.engine_name);
        set("CHAOS_NAMESPACE", &mut self.chaos_namespace);
        set("APP_NS", &mut self.app_namespace);
        set("APP_LABEL", &mut self.app_label);
    }

    /// Name of the chaos result resource for this engine/experiment pair
    pub fn result_name(&self) -> String {
        format!("{}-{}", self.engine_name, self.experiment_name)
    }

    /// Name of the runner pod spawned for this engine
    pub fn runner_pod_name(&self) -> String {
        format!("{}-runner", self.engine_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = TestContext::new("disk-fill", "job-cleanup-policy", CleanupPolicy::Retain);
        assert_eq!(ctx.experiment_name, "disk-fill");
        assert_eq!(ctx.engine_name, "job-cleanup-policy-engine");
        assert_eq!(ctx.chaos_namespace, "litmus");
        assert_eq!(ctx.app_namespace, "default");
        assert_eq!(ctx.cleanup_policy, CleanupPolicy::Retain);
        assert_eq!(ctx.result_name(), "job-cleanup-policy-engine-disk-fill");
        assert_eq!(ctx.runner_pod_name(), "job-cleanup-policy-engine-runner");
    }

    #[test]
    fn test_load_env_overrides() {
        let mut ctx = TestContext::new("disk-fill", "job-cleanup-policy", CleanupPolicy::Delete);
        ctx.load_env_from(|key| match key {
            "APP_NS" => Some("workloads".to_string()),
            "CHAOS_NAMESPACE" => Some("chaos".to_string()),
            "APP_LABEL" => Some("".to_string()),
            _ => None,
        });
        assert_eq!(ctx.app_namespace, "workloads");
        assert_eq!(ctx.chaos_namespace, "chaos");
        // empty value keeps the default
        assert_eq!(ctx.app_label, "run=nginx");
        // policy is never env-derived
        assert_eq!(ctx.cleanup_policy, CleanupPolicy::Delete);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("retain".parse::<CleanupPolicy>().unwrap(), CleanupPolicy::Retain);
        assert_eq!("delete".parse::<CleanupPolicy>().unwrap(), CleanupPolicy::Delete);
        assert!("keep".parse::<CleanupPolicy>().is_err());
    }
}
