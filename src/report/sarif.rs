use crate::checks::registry::Registry;
use crate::types::scorecard::{Grade, ObjectIdentity, Scorecard};
use serde_json::json;
use sha2::{Digest, Sha256};

pub fn to_sarif(scorecard: &Scorecard, registry: &Registry) -> Result<String, serde_json::Error> {
    let rules: Vec<_> = registry
        .all()
        .iter()
        .map(|check| {
            json!({
                "id": check.id,
                "name": check.title,
                "shortDescription": { "text": check.title },
            })
        })
        .collect();

    let mut results = Vec::new();
    for object in scorecard.objects() {
        for score in object.scores() {
            if score.skipped || score.grade == Grade::AllOK {
                continue;
            }
            let level = if score.grade == Grade::Critical {
                "error"
            } else {
                "warning"
            };
            for comment in &score.comments {
                results.push(json!({
                    "ruleId": score.check,
                    "level": level,
                    "message": {
                        "text": format!("{}: {} {}", object.identity(), comment.summary, comment.description)
                    },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": { "uri": object.location().name },
                            "region": { "startLine": object.location().line },
                        }
                    }],
                    "partialFingerprints": {
                        "primaryLocationLineHash": fingerprint(&score.check, object.identity(), &comment.path, &comment.summary),
                    },
                }));
            }
        }
    }

    let sarif = json!({
        "version": "2.1.0",
        "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "kubescore",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules,
                }
            },
            "results": results
        }]
    });

    serde_json::to_string_pretty(&sarif)
}

/// Stable across runs for the same finding, independent of line numbers.
fn fingerprint(check: &str, identity: &ObjectIdentity, path: &str, summary: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [
        check,
        identity.api_version.as_str(),
        identity.kind.as_str(),
        identity.namespace.as_str(),
        identity.name.as_str(),
        path,
        summary,
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
