use serde::Deserialize;
use serde_json::Value;

use crate::core::Metrics;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationEnvelope {
    pub data: Metrics,
}

/// Picks the most specific message out of a failed login body: a validation
/// detail first, then the top-level message, then the raw text.
pub(crate) fn login_failure_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    value["error"]["details"][0]["message"]
        .as_str()
        .or_else(|| value["message"].as_str())
        .map(str::to_string)
        .or_else(|| Some(trimmed.to_string()))
}
