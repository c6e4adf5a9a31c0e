use crate::types::MonitorSpec;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_spec(json: &str) -> Result<MonitorSpec, ParseError> {
    Ok(serde_json::from_str(json)?)
}
