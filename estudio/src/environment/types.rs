use estudio_core_contact_impl::{
    message_log::InMemoryContactMessageLog, ContactFeatureServiceImpl,
};
use estudio_core_health_impl::HealthFeatureServiceImpl;
use estudio_email_impl::{contact::ContactEmailServiceImpl, EmailServiceImpl};
use estudio_shared_impl::{
    id::IdServiceImpl, ratelimit::RateLimitServiceImpl, time::TimeServiceImpl,
};
use estudio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = estudio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;
pub type ContactEmail = ContactEmailServiceImpl<Email, Template>;

// Template
pub type Template = TemplateServiceImpl;

// Shared
pub type Id = IdServiceImpl;
pub type Time = TimeServiceImpl;
pub type RateLimit = RateLimitServiceImpl<Time>;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
pub type ContactFeature =
    ContactFeatureServiceImpl<Time, Id, RateLimit, ContactEmail, MessageLog>;
pub type MessageLog = InMemoryContactMessageLog;
