use estudio_core_contact_contracts::{
    ContactFeatureService, ContactMessageLog, ContactSubmitError, ContactSubmitOutcome,
};
use estudio_di::Build;
use estudio_email_contracts::contact::ContactEmailService;
use estudio_models::contact::{
    ContactFormData, ContactMessage, ContactMessageId, SubmissionMetadata,
};
use estudio_shared_contracts::{
    ratelimit::{RateLimitDecision, RateLimitService},
    IdService, TimeService,
};
use tracing::{error, warn};

pub mod message_log;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Time, Id, RateLimit, ContactEmail, MessageLog> {
    time: Time,
    id: Id,
    ratelimit: RateLimit,
    contact_email: ContactEmail,
    message_log: MessageLog,
}

impl<Time, Id, RateLimit, ContactEmail, MessageLog> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Id, RateLimit, ContactEmail, MessageLog>
where
    Time: TimeService,
    Id: IdService,
    RateLimit: RateLimitService,
    ContactEmail: ContactEmailService,
    MessageLog: ContactMessageLog,
{
    async fn submit_message(
        &self,
        form: ContactFormData,
        metadata: SubmissionMetadata,
    ) -> Result<ContactSubmitOutcome, ContactSubmitError> {
        if let RateLimitDecision::Limited { retry_after } = self.ratelimit.check(metadata.source) {
            return Err(ContactSubmitError::RateLimited { retry_after });
        }

        if form.is_honeypot_tripped() {
            warn!(source = %metadata.source, "honeypot tripped, dropping automated submission");
            return Ok(ContactSubmitOutcome::SpamBlocked);
        }

        let message = ContactMessage::new(&form, self.time.now())?;

        let id = self.id.generate::<ContactMessageId>();
        if let Err(err) = self.message_log.record(id, &message).await {
            warn!(%err, "failed to record contact message");
        }

        let message_id = self
            .contact_email
            .send_contact_notification(&message, &metadata)
            .await
            .map_err(|err| {
                error!(%err, source = %metadata.source, "failed to dispatch contact notification");
                ContactSubmitError::Send
            })?;

        Ok(ContactSubmitOutcome::Sent { message_id })
    }
}
