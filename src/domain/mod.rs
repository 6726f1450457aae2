//! Typed Kubernetes objects as seen by the checks.
//!
//! Only the fields the checks read are modelled. Everything else in a
//! manifest is ignored during decoding.

pub mod index;
pub mod pod;

use crate::types::scorecard::{FileLocation, ObjectIdentity};
use pod::{PodSpec, PodTemplateSpec, PodTemplateView};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Annotation listing check ids that must not run for the annotated object.
pub const IGNORE_ANNOTATION: &str = "kubescore/ignore";
/// Annotation listing optional check ids to run for the annotated object.
pub const ENABLE_ANNOTATION: &str = "kubescore/enable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pod,
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    Job,
    CronJob,
    Service,
    ServiceAccount,
    NetworkPolicy,
    Other,
}

impl Kind {
    /// Every kind that carries a pod template.
    pub const POD_TEMPLATED: &'static [Kind] = &[
        Kind::Pod,
        Kind::Deployment,
        Kind::StatefulSet,
        Kind::DaemonSet,
        Kind::ReplicaSet,
        Kind::Job,
        Kind::CronJob,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Comma separated values of an annotation, trimmed, empty entries dropped.
    pub fn annotation_list<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.annotations
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: String,
    pub values: Vec<String>,
}

impl LabelSelector {
    /// Kubernetes selector semantics. An empty selector matches everything.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        subset_of(&self.match_labels, labels)
            && self
                .match_expressions
                .iter()
                .all(|requirement| requirement.matches(labels))
    }
}

impl LabelSelectorRequirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator.as_str() {
            "In" => value.is_some_and(|value| self.values.contains(value)),
            "NotIn" => value.map_or(true, |value| !self.values.contains(value)),
            "Exists" => value.is_some(),
            "DoesNotExist" => value.is_none(),
            _ => false,
        }
    }
}

/// True when every entry of `selector` is present in `labels`.
pub fn subset_of(selector: &BTreeMap<String, String>, labels: &BTreeMap<String, String>) -> bool {
    selector
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadSpec {
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CronJobSpec {
    pub job_template: JobTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobTemplateSpec {
    pub spec: WorkloadSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSpec {
    pub selector: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceAccountSpec {
    pub automount_service_account_token: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPolicySpec {
    pub pod_selector: LabelSelector,
    pub policy_types: Option<Vec<String>>,
    pub egress: Vec<serde_yaml::Value>,
}

impl NetworkPolicySpec {
    /// Ingress is always covered when `policyTypes` is absent. Egress is
    /// covered only when egress rules exist.
    pub fn covers(&self, policy_type: &str) -> bool {
        match &self.policy_types {
            Some(types) => types.iter().any(|entry| entry == policy_type),
            None => match policy_type {
                "Ingress" => true,
                "Egress" => !self.egress.is_empty(),
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceBody {
    Pod(PodSpec),
    Deployment(WorkloadSpec),
    StatefulSet(WorkloadSpec),
    DaemonSet(WorkloadSpec),
    ReplicaSet(WorkloadSpec),
    Job(WorkloadSpec),
    CronJob(CronJobSpec),
    Service(ServiceSpec),
    ServiceAccount(ServiceAccountSpec),
    NetworkPolicy(NetworkPolicySpec),
    Other,
}

/// One decoded manifest document. Read-only once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub api_version: String,
    pub kind_name: String,
    pub metadata: ObjectMeta,
    pub body: ResourceBody,
    pub location: FileLocation,
}

impl Resource {
    pub fn kind(&self) -> Kind {
        match &self.body {
            ResourceBody::Pod(_) => Kind::Pod,
            ResourceBody::Deployment(_) => Kind::Deployment,
            ResourceBody::StatefulSet(_) => Kind::StatefulSet,
            ResourceBody::DaemonSet(_) => Kind::DaemonSet,
            ResourceBody::ReplicaSet(_) => Kind::ReplicaSet,
            ResourceBody::Job(_) => Kind::Job,
            ResourceBody::CronJob(_) => Kind::CronJob,
            ResourceBody::Service(_) => Kind::Service,
            ResourceBody::ServiceAccount(_) => Kind::ServiceAccount,
            ResourceBody::NetworkPolicy(_) => Kind::NetworkPolicy,
            ResourceBody::Other => Kind::Other,
        }
    }

    pub fn namespace(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or("default")
    }

    pub fn identity(&self) -> ObjectIdentity {
        ObjectIdentity {
            api_version: self.api_version.clone(),
            kind: self.kind_name.clone(),
            namespace: self.namespace().to_string(),
            name: self.metadata.name.clone(),
        }
    }

    /// Pod template of any pod-bearing kind. A bare Pod is its own template.
    pub fn pod_template(&self) -> Option<PodTemplateView<'_>> {
        let template = match &self.body {
            ResourceBody::Pod(spec) => {
                return Some(PodTemplateView {
                    metadata: &self.metadata,
                    spec,
                })
            }
            ResourceBody::Deployment(workload)
            | ResourceBody::StatefulSet(workload)
            | ResourceBody::DaemonSet(workload)
            | ResourceBody::ReplicaSet(workload)
            | ResourceBody::Job(workload) => &workload.template,
            ResourceBody::CronJob(cron) => &cron.job_template.spec.template,
            _ => return None,
        };
        Some(PodTemplateView {
            metadata: &template.metadata,
            spec: &template.spec,
        })
    }

    pub fn is_ignored(&self, check: &str) -> bool {
        self.metadata
            .annotation_list(IGNORE_ANNOTATION)
            .any(|id| id == check)
    }

    pub fn is_enabled(&self, check: &str) -> bool {
        self.metadata
            .annotation_list(ENABLE_ANNOTATION)
            .any(|id| id == check)
    }
}
