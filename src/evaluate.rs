//! Dispatch of active checks over parsed objects.
//!
//! Objects are scored independently. With `parallel` set they are scored on
//! the rayon pool; the indexed collect keeps input order either way.

use crate::checks::registry::Registry;
use crate::checks::selection::Selection;
use crate::checks::{CheckDefinition, CheckInput, Outcome};
use crate::domain::index::ObjectIndex;
use crate::domain::Resource;
use crate::types::scorecard::{Grade, ObjectScore, Scorecard, TestScore};
use rayon::prelude::*;

pub fn evaluate(
    objects: &[Resource],
    registry: &Registry,
    selection: &Selection,
    parallel: bool,
) -> Scorecard {
    let index = ObjectIndex::new(objects);
    let score = |object: &Resource| score_object(object, index, registry, selection);

    let entries: Vec<ObjectScore> = if parallel {
        objects.par_iter().map(score).collect()
    } else {
        objects.iter().map(score).collect()
    };
    Scorecard::new(entries)
}

fn score_object(
    object: &Resource,
    index: ObjectIndex<'_>,
    registry: &Registry,
    selection: &Selection,
) -> ObjectScore {
    let kind = object.kind();
    let scores = registry
        .all()
        .iter()
        .filter(|check| check.applies_to(kind))
        .filter(|check| selection.is_active_with_opt_in(check, object.is_enabled(check.id)))
        .map(|check| run_check(check, object, index))
        .collect();
    ObjectScore::new(object.identity(), object.location.clone(), scores)
}

fn run_check(check: &CheckDefinition, object: &Resource, index: ObjectIndex<'_>) -> TestScore {
    if object.is_ignored(check.id) {
        tracing::debug!(check = check.id, object = %object.identity(), "skipped by annotation");
        return TestScore {
            check: check.id.to_string(),
            title: check.title.to_string(),
            grade: Grade::AllOK,
            comments: Vec::new(),
            skipped: true,
        };
    }

    let related = match check.requires {
        Some(relation) => match relation.resolve(object, index) {
            Ok(related) => related,
            Err(comment) => {
                tracing::debug!(check = check.id, object = %object.identity(), "unresolved relation");
                let mut outcome = Outcome::ok();
                outcome.add(Grade::Critical, comment);
                return into_score(check, outcome);
            }
        },
        None => Vec::new(),
    };

    let outcome = (check.eval)(&CheckInput {
        object,
        related,
        index,
    });
    tracing::trace!(check = check.id, object = %object.identity(), grade = %outcome.grade, "evaluated");
    into_score(check, outcome)
}

fn into_score(check: &CheckDefinition, outcome: Outcome) -> TestScore {
    TestScore {
        check: check.id.to_string(),
        title: check.title.to_string(),
        grade: outcome.grade,
        comments: outcome.comments,
        skipped: false,
    }
}
