use super::registry::Registry;
use super::{CheckDefinition, CheckInput, Outcome};
use crate::domain::{subset_of, Kind, ResourceBody};
use crate::error::Result;
use crate::types::scorecard::{Comment, Grade};
use crate::types::version::VersionRange;

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(CheckDefinition {
        id: "service-targets-pod",
        title: "Service Targets Pod",
        targets: &[Kind::Service],
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: service_targets_pod,
    })
}

fn service_targets_pod(input: &CheckInput<'_>) -> Outcome {
    let mut outcome = Outcome::ok();
    let ResourceBody::Service(service) = &input.object.body else {
        return outcome;
    };
    // ExternalName services and services with manual Endpoints carry no selector
    if service.selector.is_empty() {
        return outcome;
    }

    let matched = input
        .index
        .pod_templates_in(input.object.namespace())
        .any(|template| subset_of(&service.selector, &template.metadata.labels));
    if !matched {
        outcome.add(
            Grade::Critical,
            Comment::new(
                "spec.selector",
                "The services selector does not match any pods",
                "Update spec.selector to match the labels of a pod template in the same namespace.",
            ),
        );
    }
    outcome
}
