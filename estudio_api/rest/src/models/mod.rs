use std::collections::BTreeMap;

use serde::Serialize;

pub mod contact;

/// Successful submission. `message_id` is `"spam-blocked"` for honeypot hits,
/// which callers cannot tell apart from a delivered message.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessageAccepted {
    pub success: bool,
    pub message_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub success: bool,
    pub error_code: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiValidationError {
    pub success: bool,
    pub error_code: &'static str,
    pub errors: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRateLimitError {
    pub success: bool,
    pub error_code: &'static str,
    pub retry_after: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSendError {
    pub success: bool,
    pub error_code: &'static str,
    pub error: &'static str,
}
