//! External collaborator seam
//!
//! The harness never talks to the cluster directly; every setup and
//! verification step goes through [`ChaosCluster`]. The production
//! implementation shells out to kubectl; tests substitute an in-memory
//! fake.

mod kubectl;
pub mod manifests;

pub use kubectl::KubectlCluster;

use async_trait::async_trait;

use crate::common::Result;
use crate::context::TestContext;

/// Operations the harness performs against the cluster under test
///
/// Wait operations block until the resource reaches the expected state
/// or an internal deadline elapses, surfacing `Error::Timeout`. No
/// retry behavior exists outside these implementations.
#[async_trait]
pub trait ChaosCluster: Send + Sync {
    /// Verify cluster credentials and reachability
    async fn connect(&self) -> Result<()>;

    /// Check that the chaos operator is running
    async fn controller_health(&self, ctx: &TestContext) -> Result<()>;

    /// Install the service account, role and role binding for the test
    async fn install_rbac(&self, ctx: &TestContext) -> Result<()>;

    /// Install the chaos experiment definition
    async fn install_experiment(&self, ctx: &TestContext) -> Result<()>;

    /// Install the chaos engine carrying the context's cleanup policy
    async fn install_engine(&self, ctx: &TestContext) -> Result<()>;

    /// Block until the runner pod is running
    async fn wait_for_runner_pod(&self, ctx: &TestContext) -> Result<()>;

    /// Block until the injection pod is running
    async fn wait_for_injection_pod(&self, ctx: &TestContext) -> Result<()>;

    /// Block until injection completes, then retrieve its logs
    async fn injection_logs(&self, ctx: &TestContext) -> Result<String>;

    /// Fetch the chaos result verdict; fails unless it settled to Pass
    async fn verdict(&self, ctx: &TestContext) -> Result<String>;

    /// Block until the chaos engine reaches a terminal state
    async fn wait_for_engine_completion(&self, ctx: &TestContext) -> Result<()>;

    /// Succeed if the job pod still exists, fail with `Error::NotFound`
    /// otherwise; the caller interprets presence per the active policy
    async fn job_pod_exists(&self, ctx: &TestContext) -> Result<()>;

    /// Remove every resource installed by prior steps; idempotent
    async fn cleanup(&self, ctx: &TestContext) -> Result<()>;
}
