use crate::error::Result;
use crate::model::IssueSummary;

pub fn to_json(summary: &IssueSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn from_json(json_str: &str) -> Result<IssueSummary> {
    Ok(serde_json::from_str(json_str)?)
}
