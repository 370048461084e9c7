use std::future::Future;

use estudio_models::contact::{
    ContactFormData, ContactFormErrors, ContactMessage, ContactMessageId, EmailMessageId,
    SubmissionMetadata,
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Runs the full submission pipeline: rate limit, honeypot, domain
    /// validation, optional recording, email dispatch.
    fn submit_message(
        &self,
        form: ContactFormData,
        metadata: SubmissionMetadata,
    ) -> impl Future<Output = Result<ContactSubmitOutcome, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSubmitOutcome {
    Sent { message_id: EmailMessageId },
    /// Honeypot tripped: dispatch was skipped, but the caller is told the
    /// submission succeeded so automated senders learn nothing.
    SpamBlocked,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Too many requests from this address.")]
    RateLimited { retry_after: u64 },
    #[error(transparent)]
    Validation(#[from] ContactFormErrors),
    #[error("Failed to send the message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Optional persistence collaborator. Recording is best effort; the
/// orchestrator ignores failures.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactMessageLog: Send + Sync + 'static {
    fn record(
        &self,
        id: ContactMessageId,
        message: &ContactMessage,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit_message(
        mut self,
        form: ContactFormData,
        metadata: SubmissionMetadata,
        result: Result<ContactSubmitOutcome, ContactSubmitError>,
    ) -> Self {
        self.expect_submit_message()
            .once()
            .with(
                mockall::predicate::eq(form),
                mockall::predicate::eq(metadata),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}

#[cfg(feature = "mock")]
impl MockContactMessageLog {
    pub fn with_record(
        mut self,
        id: ContactMessageId,
        message: ContactMessage,
        result: anyhow::Result<()>,
    ) -> Self {
        self.expect_record()
            .once()
            .with(
                mockall::predicate::eq(id),
                mockall::predicate::eq(message),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}
