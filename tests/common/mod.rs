//! In-memory cluster fake for suite tests
//!
//! Records call order, lets tests program a failure for any operation,
//! and models the policy-dependent job pod disposal: after the engine
//! completes, the job pod survives under 'retain' and disappears under
//! 'delete'.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chaos_e2e::cluster::ChaosCluster;
use chaos_e2e::{CleanupPolicy, Error, Result, TestContext};

type FailureFactory = Box<dyn Fn() -> Error + Send + Sync>;

#[derive(Default)]
pub struct FakeCluster {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, FailureFactory>>,
    installed: Mutex<HashSet<&'static str>>,
    engine_completed: Mutex<bool>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program `op` to fail with the error produced by `factory`
    pub fn fail_on(&self, op: &'static str, factory: impl Fn() -> Error + Send + Sync + 'static) {
        self.failures.lock().unwrap().insert(op, Box::new(factory));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn installed(&self) -> Vec<&'static str> {
        let mut resources: Vec<_> = self.installed.lock().unwrap().iter().copied().collect();
        resources.sort();
        resources
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        if let Some(factory) = self.failures.lock().unwrap().get(op) {
            return Err(factory());
        }
        Ok(())
    }

    fn install(&self, op: &'static str, resource: &'static str) -> Result<()> {
        self.record(op)?;
        self.installed.lock().unwrap().insert(resource);
        Ok(())
    }
}

#[async_trait]
impl ChaosCluster for FakeCluster {
    async fn connect(&self) -> Result<()> {
        self.record("connect")
    }

    async fn controller_health(&self, _ctx: &TestContext) -> Result<()> {
        self.record("controller_health")
    }

    async fn install_rbac(&self, _ctx: &TestContext) -> Result<()> {
        self.install("install_rbac", "rbac")
    }

    async fn install_experiment(&self, _ctx: &TestContext) -> Result<()> {
        self.install("install_experiment", "experiment")
    }

    async fn install_engine(&self, _ctx: &TestContext) -> Result<()> {
        self.install("install_engine", "engine")
    }

    async fn wait_for_runner_pod(&self, _ctx: &TestContext) -> Result<()> {
        self.record("wait_for_runner_pod")
    }

    async fn wait_for_injection_pod(&self, _ctx: &TestContext) -> Result<()> {
        self.record("wait_for_injection_pod")
    }

    async fn injection_logs(&self, _ctx: &TestContext) -> Result<String> {
        self.record("injection_logs")?;
        Ok("disk fill injected successfully\n".to_string())
    }

    async fn verdict(&self, _ctx: &TestContext) -> Result<String> {
        self.record("verdict")?;
        Ok("Pass".to_string())
    }

    async fn wait_for_engine_completion(&self, _ctx: &TestContext) -> Result<()> {
        self.record("wait_for_engine_completion")?;
        *self.engine_completed.lock().unwrap() = true;
        Ok(())
    }

    async fn job_pod_exists(&self, ctx: &TestContext) -> Result<()> {
        self.record("job_pod_exists")?;
        let completed = *self.engine_completed.lock().unwrap();
        if completed && ctx.cleanup_policy == CleanupPolicy::Delete {
            return Err(Error::NotFound(format!(
                "job pod for experiment '{}'",
                ctx.experiment_name
            )));
        }
        Ok(())
    }

    async fn cleanup(&self, _ctx: &TestContext) -> Result<()> {
        self.record("cleanup")?;
        self.installed.lock().unwrap().clear();
        *self.engine_completed.lock().unwrap() = false;
        Ok(())
    }
}
