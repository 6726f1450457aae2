//! Container security context checks.
//!
//! Container-level fields win over pod-level fields, and a field set at
//! neither level is unset. One evaluation produces every finding; each
//! registered check keeps only the findings it owns.

use super::registry::Registry;
use super::{CheckDefinition, CheckInput, Outcome};
use crate::domain::pod::{Container, PodSecurityContext, PodTemplateView, SecurityContext};
use crate::domain::Kind;
use crate::error::Result;
use crate::types::scorecard::{Comment, Grade};
use crate::types::version::{PlatformVersion, VersionRange};

/// IDs at or below this value are considered to collide with host users.
pub const MIN_SAFE_ID: i64 = 10000;

pub const SECCOMP_ANNOTATION: &str = "seccomp.security.alpha.kubernetes.io/defaultProfileName";

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(CheckDefinition {
        id: "container-security-context-user-group-id",
        title: "Container Security Context User Group ID",
        targets: Kind::POD_TEMPLATED,
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: user_group_id,
    })?;
    registry.register(CheckDefinition {
        id: "container-security-context-privileged",
        title: "Container Security Context Privileged",
        targets: Kind::POD_TEMPLATED,
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: privileged,
    })?;
    registry.register(CheckDefinition {
        id: "container-security-context-readonlyrootfilesystem",
        title: "Container Security Context ReadOnlyRootFilesystem",
        targets: Kind::POD_TEMPLATED,
        optional: false,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: read_only_root_filesystem,
    })?;
    registry.register(CheckDefinition {
        id: "container-security-context",
        title: "Container Security Context",
        targets: Kind::POD_TEMPLATED,
        optional: true,
        versions: VersionRange::unbounded(),
        requires: None,
        eval: security_context,
    })?;
    registry.register(CheckDefinition {
        id: "container-seccomp-profile",
        title: "Container Seccomp Profile",
        targets: Kind::POD_TEMPLATED,
        optional: true,
        // seccompProfile became a field in 1.19
        versions: VersionRange::since(PlatformVersion::new(1, 19)),
        requires: None,
        eval: seccomp_profile,
    })?;
    Ok(())
}

/// Container value if set, else pod value if set, else unset.
pub fn resolve<T: Copy>(container: Option<T>, pod: Option<T>) -> Option<T> {
    container.or(pod)
}

/// Security fields after pod-level inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectiveContext {
    pub read_only_root_filesystem: Option<bool>,
    pub run_as_user: Option<i64>,
    pub run_as_group: Option<i64>,
    pub run_as_non_root: Option<bool>,
    pub privileged: Option<bool>,
}

impl EffectiveContext {
    pub fn resolve(container: &SecurityContext, pod: Option<&PodSecurityContext>) -> Self {
        Self {
            // readOnlyRootFilesystem and privileged only exist on containers
            read_only_root_filesystem: container.read_only_root_filesystem,
            run_as_user: resolve(container.run_as_user, pod.and_then(|pod| pod.run_as_user)),
            run_as_group: resolve(container.run_as_group, pod.and_then(|pod| pod.run_as_group)),
            run_as_non_root: resolve(
                container.run_as_non_root,
                pod.and_then(|pod| pod.run_as_non_root),
            ),
            privileged: container.privileged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    NoSecurityContext,
    WritableRootFilesystem,
    LowUserId,
    LowGroupId,
    Privileged,
}

impl Finding {
    pub fn comment(self, container: &str) -> Comment {
        let (summary, description) = match self {
            Finding::NoSecurityContext => (
                "Container has no configured security context",
                "Set securityContext to run the container in a more secure context.",
            ),
            Finding::WritableRootFilesystem => (
                "The pod has a container with a writable root filesystem",
                "Set securityContext.readOnlyRootFilesystem to true",
            ),
            Finding::LowUserId => (
                "The container is running with a low user ID",
                "A userid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsUser to a value > 10000",
            ),
            Finding::LowGroupId => (
                "The container running with a low group ID",
                "A groupid above 10 000 is recommended to avoid conflicts with the host. Set securityContext.runAsGroup to a value > 10000",
            ),
            Finding::Privileged => (
                "The container is privileged",
                "Set securityContext.privileged to false. Privileged containers can access all devices on the host, and grants almost the same access as non-containerized processes on the host.",
            ),
        };
        Comment::new(container, summary, description)
    }
}

/// Every violation for one container. A container without its own
/// security context only reports that.
pub fn container_findings(container: &Container, pod: Option<&PodSecurityContext>) -> Vec<Finding> {
    let Some(context) = &container.security_context else {
        return vec![Finding::NoSecurityContext];
    };
    let effective = EffectiveContext::resolve(context, pod);
    tracing::trace!(
        container = %container.name,
        run_as_user = ?effective.run_as_user,
        run_as_group = ?effective.run_as_group,
        run_as_non_root = ?effective.run_as_non_root,
        "resolved security context"
    );

    let mut findings = Vec::new();
    if effective.read_only_root_filesystem != Some(true) {
        findings.push(Finding::WritableRootFilesystem);
    }
    if effective.run_as_user.map_or(true, |uid| uid <= MIN_SAFE_ID) {
        findings.push(Finding::LowUserId);
    }
    if effective.run_as_group.map_or(true, |gid| gid <= MIN_SAFE_ID) {
        findings.push(Finding::LowGroupId);
    }
    if effective.privileged == Some(true) {
        findings.push(Finding::Privileged);
    }
    findings
}

fn evaluate_family(input: &CheckInput<'_>, owned: &[Finding]) -> Outcome {
    let mut outcome = Outcome::ok();
    let Some(template) = input.object.pod_template() else {
        return outcome;
    };
    let pod = template.spec.security_context.as_ref();
    for container in template.spec.all_containers() {
        for finding in container_findings(container, pod) {
            if owned.contains(&finding) {
                outcome.add(Grade::Critical, finding.comment(&container.name));
            }
        }
    }
    outcome
}

fn user_group_id(input: &CheckInput<'_>) -> Outcome {
    evaluate_family(
        input,
        &[
            Finding::NoSecurityContext,
            Finding::LowUserId,
            Finding::LowGroupId,
        ],
    )
}

fn privileged(input: &CheckInput<'_>) -> Outcome {
    evaluate_family(input, &[Finding::Privileged])
}

fn read_only_root_filesystem(input: &CheckInput<'_>) -> Outcome {
    evaluate_family(
        input,
        &[Finding::NoSecurityContext, Finding::WritableRootFilesystem],
    )
}

fn security_context(input: &CheckInput<'_>) -> Outcome {
    evaluate_family(
        input,
        &[
            Finding::NoSecurityContext,
            Finding::WritableRootFilesystem,
            Finding::LowUserId,
            Finding::LowGroupId,
            Finding::Privileged,
        ],
    )
}

fn has_seccomp(template: &PodTemplateView<'_>) -> bool {
    if template.metadata.annotations.contains_key(SECCOMP_ANNOTATION) {
        return true;
    }
    let pod_profile = template
        .spec
        .security_context
        .as_ref()
        .and_then(|context| context.seccomp_profile.as_ref());
    template.spec.all_containers().all(|container| {
        let container_profile = container
            .security_context
            .as_ref()
            .and_then(|context| context.seccomp_profile.as_ref());
        container_profile
            .or(pod_profile)
            .is_some_and(|profile| !profile.profile_type.is_empty() && profile.profile_type != "Unconfined")
    })
}

fn seccomp_profile(input: &CheckInput<'_>) -> Outcome {
    let mut outcome = Outcome::ok();
    if let Some(template) = input.object.pod_template() {
        if !has_seccomp(&template) {
            outcome.add(
                Grade::Warning,
                Comment::new(
                    "metadata.annotations",
                    "The pod has not configured Seccomp for its containers",
                    "Running containers with Seccomp is recommended to reduce the kernel attack surface",
                ),
            );
        }
    }
    outcome
}
