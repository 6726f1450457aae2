pub mod human;
pub mod json;
pub mod sarif;

use crate::checks::registry::Registry;
use crate::error::KubescoreError;
use crate::types::scorecard::Scorecard;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Human,
    Json,
    Sarif,
}

pub fn render(
    scorecard: &Scorecard,
    registry: &Registry,
    format: OutputFormat,
    verbose: bool,
) -> Result<String, KubescoreError> {
    match format {
        OutputFormat::Human => Ok(human::to_human(scorecard, verbose)),
        OutputFormat::Json => json::to_json(scorecard).map_err(KubescoreError::Json),
        OutputFormat::Sarif => sarif::to_sarif(scorecard, registry).map_err(KubescoreError::Json),
    }
}
