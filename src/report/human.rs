use crate::types::scorecard::{Grade, Scorecard, TestScore};

pub fn to_human(scorecard: &Scorecard, verbose: bool) -> String {
    let mut output = String::new();
    if scorecard.objects().is_empty() {
        output.push_str("no objects found\n");
        return output;
    }

    for object in scorecard.objects() {
        output.push_str(&format!(
            "{} [{}] ({}:{})\n",
            object.identity(),
            object.grade(),
            object.location().name,
            object.location().line
        ));
        for score in object.scores() {
            if !verbose && (score.skipped || score.grade == Grade::AllOK) {
                continue;
            }
            write_score(&mut output, score);
        }
    }

    output
}

fn write_score(output: &mut String, score: &TestScore) {
    let label = if score.skipped {
        "SKIPPED"
    } else {
        score.grade.label()
    };
    output.push_str(&format!("    [{}] {}\n", label, score.title));
    for comment in &score.comments {
        if comment.path.is_empty() {
            output.push_str(&format!("        · {}\n", comment.summary));
        } else {
            output.push_str(&format!("        · {} -> {}\n", comment.path, comment.summary));
        }
        if !comment.description.is_empty() {
            output.push_str(&format!("            {}\n", comment.description));
        }
    }
}
