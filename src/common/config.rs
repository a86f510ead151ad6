//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Cluster access settings
    #[serde(default)]
    pub cluster: ClusterConfig,
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Timeout waiting for a pod to reach the running phase
    #[serde(default = "default_pod_ready")]
    pub pod_ready_secs: u64,

    /// Timeout waiting for the chaos engine to reach a terminal state
    #[serde(default = "default_engine_completion")]
    pub engine_completion_secs: u64,

    /// Timeout waiting for the chaos result verdict to settle
    #[serde(default = "default_verdict")]
    pub verdict_secs: u64,

    /// Interval between resource-state polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            pod_ready_secs: default_pod_ready(),
            engine_completion_secs: default_engine_completion(),
            verdict_secs: default_verdict(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_pod_ready() -> u64 {
    180
}
fn default_engine_completion() -> u64 {
    600
}
fn default_verdict() -> u64 {
    300
}
fn default_poll_interval() -> u64 {
    2
}

/// Cluster access configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClusterConfig {
    /// Explicit path to the kubectl binary (default: search PATH)
    pub kubectl: Option<PathBuf>,

    /// Kubeconfig file to pass to kubectl (default: kubectl's own resolution)
    pub kubeconfig: Option<PathBuf>,

    /// Kube context to use
    pub context: Option<String>,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
