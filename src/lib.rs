//! chaos-e2e - end-to-end validation harness for chaos-engine job
//! cleanup policies
//!
//! A scenario runner executes ordered, named verification steps against
//! the cluster seam ([`cluster::ChaosCluster`]); steps are fail-fast and
//! each scenario is followed by an unconditional cleanup scenario.

pub mod cli;
pub mod cluster;
pub mod commands;
pub mod common;
pub mod context;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, ErrorCode, Result};
pub use context::{CleanupPolicy, TestContext};
