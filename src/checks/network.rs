use super::registry::Registry;
use super::{CheckDefinition, CheckInput, Outcome};
use crate::domain::{Kind, ResourceBody};
use crate::error::Result;
use crate::types::scorecard::{Comment, Grade};
use crate::types::version::VersionRange;

const CNI_NOTE: &str = "Note, this feature needs to be supported by the CNI implementation used in the Kubernetes cluster to have an effect.";

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(CheckDefinition {
        id: "pod-networkpolicy",
        title: "Pod NetworkPolicy",
        targets: Kind::POD_TEMPLATED,
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: pod_has_network_policy,
    })?;
    registry.register(CheckDefinition {
        id: "networkpolicy-targets-pod",
        title: "NetworkPolicy targets Pod",
        targets: &[Kind::NetworkPolicy],
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: network_policy_targets_pod,
    })?;
    Ok(())
}

fn pod_has_network_policy(input: &CheckInput<'_>) -> Outcome {
    let mut outcome = Outcome::ok();
    let Some(template) = input.object.pod_template() else {
        return outcome;
    };

    let matching: Vec<_> = input
        .index
        .network_policies_in(input.object.namespace())
        .filter(|policy| policy.pod_selector.matches(&template.metadata.labels))
        .collect();

    if matching.is_empty() {
        outcome.add(
            Grade::Critical,
            Comment::new(
                "",
                "The pod does not have a matching NetworkPolicy",
                format!(
                    "Create a NetworkPolicy that targets this pod to control who/what can communicate with this pod. {CNI_NOTE}"
                ),
            ),
        );
        return outcome;
    }

    if !matching.iter().any(|policy| policy.covers("Ingress")) {
        outcome.add(
            Grade::Warning,
            Comment::new(
                "",
                "The pod does not have a matching ingress NetworkPolicy",
                format!("Add an ingress policy to the pods NetworkPolicy. {CNI_NOTE}"),
            ),
        );
    }
    if !matching.iter().any(|policy| policy.covers("Egress")) {
        outcome.add(
            Grade::Warning,
            Comment::new(
                "",
                "The pod does not have a matching egress NetworkPolicy",
                format!("Add an egress policy to the pods NetworkPolicy. {CNI_NOTE}"),
            ),
        );
    }
    outcome
}

fn network_policy_targets_pod(input: &CheckInput<'_>) -> Outcome {
    let mut outcome = Outcome::ok();
    let ResourceBody::NetworkPolicy(policy) = &input.object.body else {
        return outcome;
    };

    let targets_any = input
        .index
        .pod_templates_in(input.object.namespace())
        .any(|template| policy.pod_selector.matches(&template.metadata.labels));
    if !targets_any {
        outcome.add(
            Grade::Critical,
            Comment::new(
                "spec.podSelector",
                "The NetworkPolicy's selector doesn't match any pods",
                "Update spec.podSelector to match the labels of at least one pod in the same namespace.",
            ),
        );
    }
    outcome
}
