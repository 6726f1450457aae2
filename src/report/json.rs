use crate::types::scorecard::Scorecard;

pub fn to_json(scorecard: &Scorecard) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scorecard)
}
