use std::future::Future;

use estudio_models::contact::{ContactMessage, EmailMessageId, SubmissionMetadata};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactEmailService: Send + Sync + 'static {
    /// Renders the locale-specific notification and dispatches it to the
    /// studio inbox, with reply-to set to the message author.
    fn send_contact_notification(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
    ) -> impl Future<Output = anyhow::Result<EmailMessageId>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactEmailService {
    pub fn with_send_contact_notification(
        mut self,
        message: ContactMessage,
        metadata: SubmissionMetadata,
        result: anyhow::Result<EmailMessageId>,
    ) -> Self {
        self.expect_send_contact_notification()
            .once()
            .with(
                mockall::predicate::eq(message),
                mockall::predicate::eq(metadata),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}
