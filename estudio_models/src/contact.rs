use std::{collections::BTreeMap, net::IpAddr, sync::LazyLock};

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{email_address::EmailAddress, locale::Locale};

/// Longest address accepted by the validator, per RFC 5321 errata.
pub const EMAIL_MAX_CHARS: usize = 254;

// Names reach the email Subject header, so only literal spaces are allowed.
pub static CONTACT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M} '.-]+$").unwrap());

/// One visitor-submitted contact message. Constructed once per request and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: Option<ContactMessageSubject>,
    pub content: ContactMessageContent,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 100, regex = CONTACT_NAME_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 200),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 10, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deref,
    From,
    Display,
    Serialize,
    Deserialize,
))]
pub struct ContactMessageId(::uuid::Uuid);

/// Identifier reported by the email dispatch adapter for a completed send.
#[nutype(derive(Debug, Clone, PartialEq, Eq, Deref, From, Display, Serialize, Deserialize))]
pub struct EmailMessageId(String);

/// The raw contact form as submitted over HTTP, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    /// Honeypot field. Hidden from humans, so any non-empty value flags the
    /// submission as automated.
    pub website: String,
}

impl ContactFormData {
    /// Checks all field constraints without constructing the domain entity.
    /// Pure and deterministic; the REST layer maps the error directly to a
    /// field-level 400 response.
    pub fn validate(&self) -> Result<(), ContactFormErrors> {
        validate_fields(self).map(|_| ())
    }

    pub fn is_honeypot_tripped(&self) -> bool {
        !self.website.trim().is_empty()
    }
}

/// Technical context captured for an inbound submission and embedded in the
/// notification email. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub source: IpAddr,
    pub user_agent: Option<String>,
    pub locale: Locale,
}

/// Validation failures keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("The submitted contact form data is invalid")]
pub struct ContactFormErrors(pub BTreeMap<String, Vec<String>>);

impl ContactFormErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ContactMessage {
    /// Construction re-checks every business invariant, independently of the
    /// request-level validation.
    pub fn new(
        form: &ContactFormData,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ContactFormErrors> {
        let ValidatedFields {
            name,
            email,
            subject,
            content,
        } = validate_fields(form)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
            created_at,
        })
    }
}

struct ValidatedFields {
    name: ContactMessageAuthorName,
    email: EmailAddress,
    subject: Option<ContactMessageSubject>,
    content: ContactMessageContent,
}

fn validate_fields(form: &ContactFormData) -> Result<ValidatedFields, ContactFormErrors> {
    let mut errors = ContactFormErrors::default();

    let name = if form.name.trim().is_empty() {
        errors.push("name", "is required");
        None
    } else {
        match ContactMessageAuthorName::try_from(form.name.clone()) {
            Ok(name) => Some(name),
            Err(err) => {
                errors.push(
                    "name",
                    match err {
                        ContactMessageAuthorNameError::LenCharMinViolated
                        | ContactMessageAuthorNameError::LenCharMaxViolated => {
                            "must be between 2 and 100 characters"
                        }
                        ContactMessageAuthorNameError::RegexViolated => {
                            "contains invalid characters"
                        }
                    },
                );
                None
            }
        }
    };

    let email = validate_email(&form.email, &mut errors);

    let subject = match form.subject.as_deref().map(str::trim) {
        None | Some("") => Some(None),
        Some(subject) => match ContactMessageSubject::try_from(subject.to_owned()) {
            Ok(subject) => Some(Some(subject)),
            Err(ContactMessageSubjectError::LenCharMaxViolated) => {
                errors.push("subject", "must be at most 200 characters");
                None
            }
        },
    };

    let content = if form.message.trim().is_empty() {
        errors.push("message", "is required");
        None
    } else {
        match ContactMessageContent::try_from(form.message.clone()) {
            Ok(content) => Some(content),
            Err(err) => {
                errors.push(
                    "message",
                    match err {
                        ContactMessageContentError::LenCharMinViolated => {
                            "must be at least 10 characters"
                        }
                        ContactMessageContentError::LenCharMaxViolated => {
                            "must be at most 5000 characters"
                        }
                    },
                );
                None
            }
        }
    };

    match (name, email, subject, content) {
        (Some(name), Some(email), Some(subject), Some(content)) => Ok(ValidatedFields {
            name,
            email,
            subject,
            content,
        }),
        _ => Err(errors),
    }
}

fn validate_email(raw: &str, errors: &mut ContactFormErrors) -> Option<EmailAddress> {
    let normalized = raw.trim().to_lowercase();

    if normalized.is_empty() {
        errors.push("email", "is required");
        return None;
    }

    if normalized.chars().count() > EMAIL_MAX_CHARS {
        errors.push("email", "must be at most 254 characters");
        return None;
    }

    match normalized.parse::<EmailAddress>() {
        Ok(email) if email.0.domain().contains('.') => Some(email),
        _ => {
            errors.push("email", "must be a valid email address");
            None
        }
    }
}
