//! Manifest rendering for the resources the harness installs
//!
//! Each kind is a plain Serialize struct rendered to YAML. The engine
//! manifest is where the cleanup policy under test ends up.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::common::Result;
use crate::context::TestContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    name: String,
    namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

impl Metadata {
    fn new(name: &str, ctx: &TestContext) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert("app.kubernetes.io/managed-by".to_string(), "chaos-e2e".to_string());
        labels.insert("chaos-e2e/test".to_string(), ctx.test_label.clone());
        Self {
            name: name.to_string(),
            namespace: ctx.chaos_namespace.clone(),
            labels,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceAccount {
    api_version: String,
    kind: String,
    metadata: Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyRule {
    api_groups: Vec<String>,
    resources: Vec<String>,
    verbs: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Role {
    api_version: String,
    kind: String,
    metadata: Metadata,
    rules: Vec<PolicyRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleRef {
    api_group: String,
    kind: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Subject {
    kind: String,
    name: String,
    namespace: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleBinding {
    api_version: String,
    kind: String,
    metadata: Metadata,
    role_ref: RoleRef,
    subjects: Vec<Subject>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChaosExperiment {
    api_version: String,
    kind: String,
    metadata: Metadata,
    spec: ExperimentSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExperimentSpec {
    definition: ExperimentDefinition,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExperimentDefinition {
    scope: String,
    image: String,
    args: Vec<String>,
    command: Vec<String>,
    env: Vec<EnvVar>,
    labels: BTreeMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvVar {
    name: String,
    value: String,
}

impl EnvVar {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChaosEngine {
    api_version: String,
    kind: String,
    metadata: Metadata,
    spec: EngineSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineSpec {
    engine_state: String,
    appinfo: AppInfo,
    chaos_service_account: String,
    job_clean_up_policy: String,
    experiments: Vec<EngineExperiment>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppInfo {
    appns: String,
    applabel: String,
    appkind: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineExperiment {
    name: String,
    spec: EngineExperimentSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EngineExperimentSpec {
    components: Components,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Components {
    env: Vec<EnvVar>,
}

/// Service account name used by the experiment job
pub fn service_account_name(ctx: &TestContext) -> String {
    format!("{}-sa", ctx.test_label)
}

/// Render the ServiceAccount, Role and RoleBinding as one multi-doc YAML
pub fn rbac(ctx: &TestContext) -> Result<String> {
    let sa_name = service_account_name(ctx);

    let sa = ServiceAccount {
        api_version: "v1".to_string(),
        kind: "ServiceAccount".to_string(),
        metadata: Metadata::new(&sa_name, ctx),
    };

    let role = Role {
        api_version: "rbac.authorization.k8s.io/v1".to_string(),
        kind: "Role".to_string(),
        metadata: Metadata::new(&sa_name, ctx),
        rules: vec![
            PolicyRule {
                api_groups: vec!["".to_string(), "batch".to_string(), "litmuschaos.io".to_string()],
                resources: vec![
                    "pods".to_string(),
                    "pods/log".to_string(),
                    "events".to_string(),
                    "jobs".to_string(),
                    "chaosengines".to_string(),
                    "chaosexperiments".to_string(),
                    "chaosresults".to_string(),
                ],
                verbs: vec!["*".to_string()],
            },
        ],
    };

    let binding = RoleBinding {
        api_version: "rbac.authorization.k8s.io/v1".to_string(),
        kind: "RoleBinding".to_string(),
        metadata: Metadata::new(&sa_name, ctx),
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: "Role".to_string(),
            name: sa_name.clone(),
        },
        subjects: vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: sa_name,
            namespace: ctx.chaos_namespace.clone(),
        }],
    };

    Ok(format!(
        "{}---\n{}---\n{}",
        serde_yaml::to_string(&sa)?,
        serde_yaml::to_string(&role)?,
        serde_yaml::to_string(&binding)?
    ))
}

/// Render the chaos experiment definition for the context's experiment
pub fn experiment(ctx: &TestContext) -> Result<String> {
    let mut labels = BTreeMap::new();
    labels.insert("name".to_string(), ctx.experiment_name.clone());

    let experiment = ChaosExperiment {
        api_version: "litmuschaos.io/v1alpha1".to_string(),
        kind: "ChaosExperiment".to_string(),
        metadata: Metadata::new(&ctx.experiment_name, ctx),
        spec: ExperimentSpec {
            definition: ExperimentDefinition {
                scope: "Namespaced".to_string(),
                image: "litmuschaos/go-runner:latest".to_string(),
                args: vec![
                    "-c".to_string(),
                    format!("./experiments -name {}", ctx.experiment_name),
                ],
                command: vec!["/bin/bash".to_string()],
                env: vec![
                    EnvVar::new("TOTAL_CHAOS_DURATION", "15"),
                    EnvVar::new("FILL_PERCENTAGE", "80"),
                ],
                labels,
            },
        },
    };

    serde_yaml::to_string(&experiment).map_err(Into::into)
}

/// Render the chaos engine carrying the context's cleanup policy
pub fn engine(ctx: &TestContext) -> Result<String> {
    let engine = ChaosEngine {
        api_version: "litmuschaos.io/v1alpha1".to_string(),
        kind: "ChaosEngine".to_string(),
        metadata: Metadata::new(&ctx.engine_name, ctx),
        spec: EngineSpec {
            engine_state: "active".to_string(),
            appinfo: AppInfo {
                appns: ctx.app_namespace.clone(),
                applabel: ctx.app_label.clone(),
                appkind: "deployment".to_string(),
            },
            chaos_service_account: service_account_name(ctx),
            job_clean_up_policy: ctx.cleanup_policy.as_str().to_string(),
            experiments: vec![EngineExperiment {
                name: ctx.experiment_name.clone(),
                spec: EngineExperimentSpec {
                    components: Components {
                        env: vec![EnvVar::new("TOTAL_CHAOS_DURATION", "15")],
                    },
                },
            }],
        },
    };

    serde_yaml::to_string(&engine).map_err(Into::into)
}
