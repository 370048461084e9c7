use std::time::Duration;

use anyhow::bail;
use estudio_email_contracts::{Email, EmailService};
use estudio_models::contact::EmailMessageId;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

/// Stand-in transport that never leaves the process. It simulates provider
/// latency, logs a summary of the would-be email, and injects failures at a
/// configured rate so the failure paths stay exercised in development.
#[derive(Debug, Clone, Default)]
pub struct InertEmailService {
    config: InertEmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct InertEmailServiceConfig {
    pub latency: Duration,
    /// Probability in `[0, 1]` of a simulated send failure.
    pub fault_rate: f64,
}

impl Default for InertEmailServiceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(150),
            fault_rate: 0.0,
        }
    }
}

impl InertEmailService {
    pub fn new(config: InertEmailServiceConfig) -> Self {
        // `gen_bool` panics outside [0, 1], so misconfigured rates are clamped.
        Self {
            config: InertEmailServiceConfig {
                fault_rate: config.fault_rate.clamp(0.0, 1.0),
                ..config
            },
        }
    }
}

impl EmailService for InertEmailService {
    async fn send(&self, email: Email) -> anyhow::Result<EmailMessageId> {
        tokio::time::sleep(self.config.latency).await;

        if self.config.fault_rate > 0.0 && rand::thread_rng().gen_bool(self.config.fault_rate) {
            bail!("Injected email transport fault");
        }

        let message_id = EmailMessageId::from(format!("inert-{}", Uuid::new_v4()));
        info!(
            recipient = %email.recipient,
            subject = %email.subject,
            %message_id,
            "inert email transport: dropping message"
        );

        Ok(message_id)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use estudio_email_contracts::EmailBody;

    use super::*;

    fn email() -> Email {
        Email {
            recipient: "test@example.com".parse().unwrap(),
            subject: "Test".into(),
            body: EmailBody::Text("Hello World!".into()),
            reply_to: None,
        }
    }

    fn sut(fault_rate: f64) -> InertEmailService {
        InertEmailService::new(InertEmailServiceConfig {
            latency: Duration::ZERO,
            fault_rate,
        })
    }

    #[tokio::test]
    async fn returns_synthetic_message_id() {
        // Arrange
        let sut = sut(0.0);

        // Act
        let message_id = sut.send(email()).await.unwrap();

        // Assert
        assert!(message_id.starts_with("inert-"));
    }

    #[tokio::test]
    async fn out_of_range_fault_rate_is_clamped() {
        // Arrange
        let sut = sut(7.5);

        // Act
        let result = sut.send(email()).await;

        // Assert
        result.unwrap_err();
    }

    #[tokio::test]
    async fn injected_fault_fails_the_send() {
        // Arrange
        let sut = sut(1.0);

        // Act
        let result = sut.send(email()).await;

        // Assert
        result.unwrap_err();
    }
}
