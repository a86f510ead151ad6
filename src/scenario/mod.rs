//! Scenario runner
//!
//! A scenario is an ordered list of named steps executed strictly in
//! sequence against the cluster seam; the first step whose outcome
//! violates its expectation aborts the rest of the scenario.

mod runner;
mod step;
mod suite;

pub use runner::{run_scenario, ScenarioResult};
pub use step::{Expectation, Phase, Step, StepKind};
pub use suite::{cleanup_scenario, policy_scenario, run_suite, SuiteReport, EXPERIMENT, TEST_LABEL};
