use super::pod::PodTemplateView;
use super::{NetworkPolicySpec, Resource, ResourceBody};

/// Read-only lookups across the full input set, used to resolve related objects.
#[derive(Debug, Clone, Copy)]
pub struct ObjectIndex<'a> {
    objects: &'a [Resource],
}

impl<'a> ObjectIndex<'a> {
    pub fn new(objects: &'a [Resource]) -> Self {
        Self { objects }
    }

    pub fn in_namespace(&self, namespace: &'a str) -> impl Iterator<Item = &'a Resource> + 'a {
        self.objects
            .iter()
            .filter(move |object| object.namespace() == namespace)
    }

    pub fn pod_templates_in(
        &self,
        namespace: &'a str,
    ) -> impl Iterator<Item = PodTemplateView<'a>> + 'a {
        self.in_namespace(namespace)
            .filter_map(|object| object.pod_template())
    }

    pub fn network_policies_in(
        &self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a NetworkPolicySpec> + 'a {
        self.in_namespace(namespace)
            .filter_map(|object| match &object.body {
                ResourceBody::NetworkPolicy(spec) => Some(spec),
                _ => None,
            })
    }

    pub fn service_account(&self, namespace: &'a str, name: &str) -> Option<&'a Resource> {
        self.in_namespace(namespace).find(|object| {
            matches!(object.body, ResourceBody::ServiceAccount(_)) && object.metadata.name == name
        })
    }
}
