pub mod json;
pub mod md;

use crate::error::{Result, ScoreError};
use crate::types::report::Evaluation;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(evaluations: &[Evaluation], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(evaluations).map_err(ScoreError::Json),
        OutputFormat::Md => Ok(md::to_markdown(evaluations)),
    }
}
