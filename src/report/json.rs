use crate::types::report::Evaluation;

pub fn to_json(evaluations: &[Evaluation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(evaluations)
}
