use estudio_models::{contact::ContactFormData, locale::Locale};
use serde::Deserialize;

/// The raw form body. Every field is optional at the wire level so that a
/// missing field surfaces as a field-level validation error rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

impl From<ApiContactRequest> for ContactFormData {
    fn from(value: ApiContactRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
            website: value.website.unwrap_or_default(),
        }
    }
}
