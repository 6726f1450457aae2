use super::CheckDefinition;
use crate::error::{KubescoreError, Result};
use crate::types::version::PlatformVersion;

/// Append-only, ordered set of check definitions.
#[derive(Debug, Default)]
pub struct Registry {
    checks: Vec<CheckDefinition>,
}

impl Registry {
    pub fn register(&mut self, definition: CheckDefinition) -> Result<()> {
        if self.get(definition.id).is_some() {
            return Err(KubescoreError::DuplicateCheck(definition.id.to_string()));
        }
        if !definition.versions.is_well_formed() {
            let bound = |version: Option<PlatformVersion>| {
                version.map_or_else(|| "*".to_string(), |version| version.to_string())
            };
            return Err(KubescoreError::InvalidVersionRange {
                id: definition.id.to_string(),
                min: bound(definition.versions.min),
                max: bound(definition.versions.max),
            });
        }
        tracing::trace!(check = definition.id, "registered check");
        self.checks.push(definition);
        Ok(())
    }

    pub fn all(&self) -> &[CheckDefinition] {
        &self.checks
    }

    pub fn get(&self, id: &str) -> Option<&CheckDefinition> {
        self.checks.iter().find(|check| check.id == id)
    }
}
