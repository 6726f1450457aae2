//! Check catalog.
//!
//! Every check is a plain function over one object plus read-only access to
//! the rest of the input. `registry()` is the only place checks are added, so
//! registration order (and therefore report order) is fixed here.

pub mod network;
pub mod registry;
pub mod security;
pub mod selection;
pub mod service;
pub mod service_account;

use crate::domain::index::ObjectIndex;
use crate::domain::{Kind, Resource};
use crate::error::Result;
use crate::types::scorecard::{Comment, Grade};
use crate::types::version::VersionRange;
use registry::Registry;
use std::fmt;

pub type CheckFn = fn(&CheckInput<'_>) -> Outcome;

#[derive(Clone, Copy)]
pub struct CheckDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub targets: &'static [Kind],
    pub optional: bool,
    pub versions: VersionRange,
    pub requires: Option<Relation>,
    pub eval: CheckFn,
}

impl CheckDefinition {
    pub fn applies_to(&self, kind: Kind) -> bool {
        self.targets.contains(&kind)
    }
}

impl fmt::Debug for CheckDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDefinition")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("targets", &self.targets)
            .field("optional", &self.optional)
            .field("versions", &self.versions)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// What a check sees: the object, its resolved related objects, and the full input.
pub struct CheckInput<'a> {
    pub object: &'a Resource,
    pub related: Vec<&'a Resource>,
    pub index: ObjectIndex<'a>,
}

/// Grade and comments produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub grade: Grade,
    pub comments: Vec<Comment>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            grade: Grade::AllOK,
            comments: Vec::new(),
        }
    }

    pub fn add(&mut self, grade: Grade, comment: Comment) {
        self.grade = self.grade.min(grade);
        self.comments.push(comment);
    }
}

/// A related object a check cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The ServiceAccount named by the pod template, unless it is the implicit `default`.
    ServiceAccount,
}

impl Relation {
    /// Related objects for `object`, or the comment explaining the missing reference.
    pub fn resolve<'a>(
        &self,
        object: &'a Resource,
        index: ObjectIndex<'a>,
    ) -> std::result::Result<Vec<&'a Resource>, Comment> {
        match self {
            Relation::ServiceAccount => {
                let Some(name) = object
                    .pod_template()
                    .and_then(|template| template.spec.service_account_name.as_deref())
                    .filter(|name| !name.is_empty() && *name != "default")
                else {
                    return Ok(Vec::new());
                };
                let namespace = object.namespace();
                index
                    .service_account(namespace, name)
                    .map(|account| vec![account])
                    .ok_or_else(|| {
                        Comment::new(
                            "spec.serviceAccountName",
                            format!("ServiceAccount {name} was not found"),
                            format!(
                                "The referenced ServiceAccount does not exist in namespace {namespace}. Create it or reference an existing ServiceAccount."
                            ),
                        )
                    })
            }
        }
    }
}

/// Builds the full, ordered check catalog.
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::default();
    security::register(&mut registry)?;
    network::register(&mut registry)?;
    service_account::register(&mut registry)?;
    service::register(&mut registry)?;
    Ok(registry)
}
