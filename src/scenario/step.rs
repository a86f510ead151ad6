//! Step definitions
//!
//! Steps are immutable once built; ordering inside a scenario is
//! significant because later steps assume the external side effects of
//! earlier ones.

use std::fmt;

use crate::common::ErrorCode;

/// Trace prefix categorizing a step for operator-facing progress output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreChaos,
    Install,
    Status,
    Verdict,
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::PreChaos => "[PreChaos]",
            Phase::Install => "[Install]",
            Phase::Status => "[Status]",
            Phase::Verdict => "[Verdict]",
            Phase::Cleanup => "[Cleanup]",
        };
        f.write_str(s)
    }
}

/// The collaborator operation a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Connect,
    LoadEnv,
    ControllerHealth,
    InstallRbac,
    InstallExperiment,
    InstallEngine,
    WaitRunnerPod,
    WaitInjectionPod,
    InjectionLogs,
    Verdict,
    WaitEngineCompletion,
    CheckJobPod,
    Cleanup,
}

/// Pass/fail predicate over a step's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The operation must complete without error
    MustSucceed,
    /// The operation must fail with exactly this error kind; success or
    /// a different failure kind both violate the expectation
    MustFailWith(ErrorCode),
}

/// A single named verification step
#[derive(Debug, Clone)]
pub struct Step {
    pub phase: Phase,
    pub label: &'static str,
    pub kind: StepKind,
    pub expect: Expectation,
}

impl Step {
    pub fn new(phase: Phase, label: &'static str, kind: StepKind) -> Self {
        Self {
            phase,
            label,
            kind,
            expect: Expectation::MustSucceed,
        }
    }

    pub fn expecting(mut self, expect: Expectation) -> Self {
        self.expect = expect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::PreChaos.to_string(), "[PreChaos]");
        assert_eq!(Phase::Cleanup.to_string(), "[Cleanup]");
    }

    #[test]
    fn test_step_defaults_to_must_succeed() {
        let step = Step::new(Phase::Status, "Runner pod running status check", StepKind::WaitRunnerPod);
        assert_eq!(step.expect, Expectation::MustSucceed);

        let step = step.expecting(Expectation::MustFailWith(ErrorCode::NotFound));
        assert_eq!(step.expect, Expectation::MustFailWith(ErrorCode::NotFound));
    }
}
