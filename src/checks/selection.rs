use super::registry::Registry;
use super::CheckDefinition;
use crate::error::{KubescoreError, Result};
use crate::types::version::PlatformVersion;
use std::collections::BTreeSet;

/// Per-run activation rules. Pure; holds no reference to the registry.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub enabled_optional: BTreeSet<String>,
    pub ignored: BTreeSet<String>,
    pub platform_version: Option<PlatformVersion>,
}

impl Selection {
    pub fn is_active(&self, definition: &CheckDefinition) -> bool {
        (!definition.optional || self.enabled_optional.contains(definition.id))
            && self.version_allows(definition)
            && !self.ignored.contains(definition.id)
    }

    /// Active for one object when the object itself opts in to an optional check.
    /// Version gating and the global ignore list still apply.
    pub fn is_active_with_opt_in(&self, definition: &CheckDefinition, opted_in: bool) -> bool {
        (!definition.optional || opted_in || self.enabled_optional.contains(definition.id))
            && self.version_allows(definition)
            && !self.ignored.contains(definition.id)
    }

    fn version_allows(&self, definition: &CheckDefinition) -> bool {
        self.platform_version
            .map_or(true, |version| definition.versions.contains(version))
    }

    pub fn active<'r>(&self, registry: &'r Registry) -> Vec<&'r CheckDefinition> {
        registry
            .all()
            .iter()
            .filter(|definition| self.is_active(definition))
            .collect()
    }

    /// Rejects identifiers the registry does not know about.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        for (field, ids) in [
            ("enabled optional tests", &self.enabled_optional),
            ("ignored tests", &self.ignored),
        ] {
            if let Some(unknown) = ids.iter().find(|id| registry.get(id).is_none()) {
                return Err(KubescoreError::UnknownCheck {
                    field,
                    id: unknown.clone(),
                });
            }
        }
        Ok(())
    }
}
