use estudio_email_contracts::{Email, EmailService};
use estudio_models::contact::EmailMessageId;

pub mod contact;
mod inert;
mod smtp;

pub use inert::{InertEmailService, InertEmailServiceConfig};
pub use smtp::SmtpEmailService;

/// Transport strategy, chosen once at startup by configuration.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Smtp(SmtpEmailService),
    Inert(InertEmailService),
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<EmailMessageId> {
        match self {
            Self::Smtp(smtp) => smtp.send(email).await,
            Self::Inert(inert) => inert.send(email).await,
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Smtp(smtp) => smtp.ping().await,
            Self::Inert(inert) => inert.ping().await,
        }
    }
}
