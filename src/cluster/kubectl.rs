//! kubectl-backed implementation of the cluster seam
//!
//! Resource state is read with `kubectl ... -o json`; manifests are
//! rendered to a temp file and applied. Wait operations poll against a
//! deadline and surface `Error::Timeout` when it elapses.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::Output;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::process::Command;

use crate::common::config::{Config, Timeouts};
use crate::common::{Error, Result};
use crate::context::TestContext;

use super::{manifests, ChaosCluster};

/// How long to wait for the chaos operator before declaring it not ready
const OPERATOR_WAIT_SECS: u64 = 60;

/// Label the chaos operator deployment carries on its pods
const OPERATOR_LABEL: &str = "name=chaos-operator";

pub struct KubectlCluster {
    kubectl: PathBuf,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
    timeouts: Timeouts,
    show_progress: bool,
}

#[derive(Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Deserialize)]
struct Pod {
    metadata: ObjectMeta,
    #[serde(default)]
    status: PodStatus,
}

#[derive(Deserialize)]
struct ObjectMeta {
    name: String,
}

#[derive(Deserialize, Default)]
struct PodStatus {
    #[serde(default)]
    phase: String,
}

impl Pod {
    fn is_running(&self) -> bool {
        self.status.phase == "Running"
    }

    fn is_terminal(&self) -> bool {
        self.status.phase == "Succeeded" || self.status.phase == "Failed"
    }
}

impl KubectlCluster {
    /// Build a cluster handle from harness configuration
    ///
    /// Resolves the kubectl binary from the config override or PATH.
    pub fn new(config: &Config, show_progress: bool) -> Result<Self> {
        let kubectl = match &config.cluster.kubectl {
            Some(path) => path.clone(),
            None => which::which("kubectl").map_err(|_| {
                Error::Config(
                    "kubectl not found in PATH. Install kubectl or set cluster.kubectl in config.toml"
                        .to_string(),
                )
            })?,
        };

        Ok(Self {
            kubectl,
            kubeconfig: config.cluster.kubeconfig.clone(),
            context: config.cluster.context.clone(),
            timeouts: config.timeouts.clone(),
            show_progress,
        })
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(&self.kubectl);
        if let Some(kubeconfig) = &self.kubeconfig {
            cmd.arg("--kubeconfig").arg(kubeconfig);
        }
        if let Some(context) = &self.context {
            cmd.arg("--context").arg(context);
        }
        cmd.args(args);
        tracing::debug!(args = ?args, "running kubectl");
        let output = cmd.output().await?;
        Ok(output)
    }

    async fn apply(&self, yaml: &str, resource: &str) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("chaos-e2e-")
            .suffix(".yaml")
            .tempfile()?;
        file.write_all(yaml.as_bytes())?;
        file.flush()?;

        let path = file.path().to_string_lossy().into_owned();
        let output = self.run(&["apply", "-f", &path]).await?;
        if !output.status.success() {
            return Err(Error::install(resource, stderr_of(&output)));
        }
        tracing::info!(resource, "applied manifest");
        Ok(())
    }

    async fn pods(&self, namespace: &str, selector: &str) -> Result<Vec<Pod>> {
        let output = self
            .run(&["get", "pods", "-n", namespace, "-l", selector, "-o", "json"])
            .await?;
        if !output.status.success() {
            return Err(Error::Internal(stderr_of(&output)));
        }
        let list: PodList = serde_json::from_slice(&output.stdout)?;
        Ok(list.items)
    }

    fn spinner(&self, what: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(what.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }

    /// Poll pods matching `selector` until `done` holds or the deadline
    /// elapses. Transient kubectl failures count as "not yet".
    async fn wait_for_pods(
        &self,
        namespace: &str,
        selector: &str,
        what: &str,
        timeout: Duration,
        done: impl Fn(&[Pod]) -> bool,
    ) -> Result<()> {
        let spinner = self.spinner(what);
        let start = Instant::now();
        let deadline = start + timeout;

        loop {
            if let Ok(pods) = self.pods(namespace, selector).await {
                if done(&pods) {
                    if let Some(pb) = &spinner {
                        pb.finish_and_clear();
                    }
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                return Err(Error::timeout(what, start.elapsed().as_secs()));
            }
            tokio::time::sleep(Duration::from_secs(self.timeouts.poll_interval_secs)).await;
        }
    }

    /// Same polling loop for a single named pod
    async fn wait_for_named_pod(
        &self,
        namespace: &str,
        name: &str,
        what: &str,
        timeout: Duration,
    ) -> Result<()> {
        let spinner = self.spinner(what);
        let start = Instant::now();
        let deadline = start + timeout;

        loop {
            let output = self
                .run(&["get", "pod", name, "-n", namespace, "-o", "json"])
                .await?;
            if output.status.success() {
                if let Ok(pod) = serde_json::from_slice::<Pod>(&output.stdout) {
                    if pod.is_running() || pod.status.phase == "Succeeded" {
                        if let Some(pb) = &spinner {
                            pb.finish_and_clear();
                        }
                        return Ok(());
                    }
                }
            }
            if Instant::now() >= deadline {
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                return Err(Error::timeout(what, start.elapsed().as_secs()));
            }
            tokio::time::sleep(Duration::from_secs(self.timeouts.poll_interval_secs)).await;
        }
    }

    /// Read a dotted path out of a resource's JSON representation
    async fn resource_field(
        &self,
        kind: &str,
        name: &str,
        namespace: &str,
        path: &[&str],
    ) -> Result<Option<String>> {
        let output = self
            .run(&["get", kind, name, "-n", namespace, "-o", "json"])
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        let mut current = &value;
        for key in path {
            match current.get(key) {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(current.as_str().map(str::to_string))
    }
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("kubectl exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl ChaosCluster for KubectlCluster {
    async fn connect(&self) -> Result<()> {
        let output = self.run(&["version", "--output=json"]).await?;
        if !output.status.success() {
            return Err(Error::Connection(stderr_of(&output)));
        }
        Ok(())
    }

    async fn controller_health(&self, ctx: &TestContext) -> Result<()> {
        self.wait_for_pods(
            &ctx.chaos_namespace,
            OPERATOR_LABEL,
            "chaos operator ready",
            Duration::from_secs(OPERATOR_WAIT_SECS),
            |pods| pods.iter().any(Pod::is_running),
        )
        .await
        .map_err(|e| match e {
            Error::Timeout { .. } => Error::NotReady(format!(
                "no running chaos operator pod in namespace '{}'",
                ctx.chaos_namespace
            )),
            other => other,
        })
    }

    async fn install_rbac(&self, ctx: &TestContext) -> Result<()> {
        self.apply(&manifests::rbac(ctx)?, "RBAC").await
    }

    async fn install_experiment(&self, ctx: &TestContext) -> Result<()> {
        self.apply(&manifests::experiment(ctx)?, "chaos experiment")
            .await
    }

    async fn install_engine(&self, ctx: &TestContext) -> Result<()> {
        self.apply(&manifests::engine(ctx)?, "chaos engine").await
    }

    async fn wait_for_runner_pod(&self, ctx: &TestContext) -> Result<()> {
        self.wait_for_named_pod(
            &ctx.chaos_namespace,
            &ctx.runner_pod_name(),
            "runner pod running",
            Duration::from_secs(self.timeouts.pod_ready_secs),
        )
        .await
    }

    async fn wait_for_injection_pod(&self, ctx: &TestContext) -> Result<()> {
        let selector = format!("name={}", ctx.experiment_name);
        self.wait_for_pods(
            &ctx.chaos_namespace,
            &selector,
            "injection pod running",
            Duration::from_secs(self.timeouts.pod_ready_secs),
            |pods| pods.iter().any(|p| p.is_running() || p.is_terminal()),
        )
        .await
    }

    async fn injection_logs(&self, ctx: &TestContext) -> Result<String> {
        let selector = format!("name={}", ctx.experiment_name);

        // Injection has to finish before its logs are complete
        self.wait_for_pods(
            &ctx.chaos_namespace,
            &selector,
            "injection completion",
            Duration::from_secs(self.timeouts.engine_completion_secs),
            |pods| !pods.is_empty() && pods.iter().all(Pod::is_terminal),
        )
        .await?;

        let output = self
            .run(&[
                "logs",
                "-n",
                &ctx.chaos_namespace,
                "-l",
                &selector,
                "--tail=-1",
            ])
            .await?;
        if !output.status.success() {
            return Err(Error::Retrieval(stderr_of(&output)));
        }

        let logs = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(experiment = %ctx.experiment_name, "injection pod logs:\n{logs}");
        Ok(logs)
    }

    async fn verdict(&self, ctx: &TestContext) -> Result<String> {
        let result_name = ctx.result_name();
        let start = Instant::now();
        let deadline = start + Duration::from_secs(self.timeouts.verdict_secs);

        loop {
            let verdict = self
                .resource_field(
                    "chaosresult",
                    &result_name,
                    &ctx.chaos_namespace,
                    &["status", "experimentStatus", "verdict"],
                )
                .await?;

            match verdict.as_deref() {
                Some("Pass") => return Ok("Pass".to_string()),
                Some("Awaited") | None => {}
                Some(other) => {
                    return Err(Error::Verdict(format!(
                        "chaosresult '{result_name}' settled to verdict '{other}'"
                    )))
                }
            }

            if Instant::now() >= deadline {
                return Err(Error::Verdict(format!(
                    "chaosresult '{result_name}' did not settle within {}s",
                    start.elapsed().as_secs()
                )));
            }
            tokio::time::sleep(Duration::from_secs(self.timeouts.poll_interval_secs)).await;
        }
    }

    async fn wait_for_engine_completion(&self, ctx: &TestContext) -> Result<()> {
        let what = "chaos engine completion";
        let spinner = self.spinner(what);
        let start = Instant::now();
        let deadline = start + Duration::from_secs(self.timeouts.engine_completion_secs);

        loop {
            let status = self
                .resource_field(
                    "chaosengine",
                    &ctx.engine_name,
                    &ctx.chaos_namespace,
                    &["status", "engineStatus"],
                )
                .await?;
            if status.as_deref() == Some("completed") {
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                return Ok(());
            }
            if Instant::now() >= deadline {
                if let Some(pb) = &spinner {
                    pb.finish_and_clear();
                }
                return Err(Error::timeout(what, start.elapsed().as_secs()));
            }
            tokio::time::sleep(Duration::from_secs(self.timeouts.poll_interval_secs)).await;
        }
    }

    async fn job_pod_exists(&self, ctx: &TestContext) -> Result<()> {
        let selector = format!("name={}", ctx.experiment_name);
        let pods = self.pods(&ctx.app_namespace, &selector).await?;
        match pods.first() {
            Some(pod) => {
                tracing::debug!(pod = %pod.metadata.name, "job pod present");
                Ok(())
            }
            None => Err(Error::NotFound(format!(
                "job pod for experiment '{}' in namespace '{}'",
                ctx.experiment_name, ctx.app_namespace
            ))),
        }
    }

    async fn cleanup(&self, ctx: &TestContext) -> Result<()> {
        let sa_name = manifests::service_account_name(ctx);

        let deletions: [&[&str]; 2] = [
            &[
                "delete",
                "chaosengine,chaosexperiment",
                "--all",
                "-n",
                &ctx.chaos_namespace,
                "--ignore-not-found",
            ],
            &[
                "delete",
                "serviceaccount,role,rolebinding",
                &sa_name,
                "-n",
                &ctx.chaos_namespace,
                "--ignore-not-found",
            ],
        ];

        for args in deletions {
            let output = self.run(args).await?;
            if !output.status.success() {
                return Err(Error::Cleanup(stderr_of(&output)));
            }
        }
        tracing::info!(namespace = %ctx.chaos_namespace, "chaos resources removed");
        Ok(())
    }
}
