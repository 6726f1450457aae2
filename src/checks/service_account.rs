use super::registry::Registry;
use super::security::resolve;
use super::{CheckDefinition, CheckInput, Outcome, Relation};
use crate::domain::{Kind, ResourceBody};
use crate::error::Result;
use crate::types::scorecard::{Comment, Grade};
use crate::types::version::VersionRange;

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(CheckDefinition {
        id: "pod-serviceaccount",
        title: "Pod ServiceAccount",
        targets: Kind::POD_TEMPLATED,
        optional: false,
        versions: VersionRange::unbounded(),
        requires: Some(Relation::ServiceAccount),
        eval: service_account_token,
    })
}

/// Runs only once the referenced ServiceAccount resolved; a missing one is
/// reported by the evaluator before this is called.
fn service_account_token(input: &CheckInput<'_>) -> Outcome {
    let mut outcome = Outcome::ok();
    let Some(template) = input.object.pod_template() else {
        return outcome;
    };
    let account_setting = input.related.iter().find_map(|related| match &related.body {
        ResourceBody::ServiceAccount(account) => account.automount_service_account_token,
        _ => None,
    });
    let Some(account) = input.related.first() else {
        return outcome;
    };

    let automount = resolve(template.spec.automount_service_account_token, account_setting);
    if automount == Some(true) {
        outcome.add(
            Grade::Warning,
            Comment::new(
                "spec.automountServiceAccountToken",
                format!(
                    "The pod mounts the token of ServiceAccount {}",
                    account.metadata.name
                ),
                "Set automountServiceAccountToken to false unless the workload talks to the Kubernetes API.",
            ),
        );
    }
    outcome
}
