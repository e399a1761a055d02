use serde::{Deserialize, Serialize};

/// The four form fields, keyed the way the upstream `/sends-message`
/// endpoint expects them. Used for both the HTML form and the JSON API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    pub number: String,
    pub reason: String,
    pub relation: String,
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub upstream: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
