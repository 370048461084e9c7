use std::time::Duration;

use anyhow::Context;
use estudio_config::{EmailBackend, EmailConfig};
use estudio_email_impl::{
    EmailServiceImpl, InertEmailService, InertEmailServiceConfig, SmtpEmailService,
};
use tracing::warn;

/// Build the configured email transport. A broken smtp configuration degrades
/// to the inert transport instead of failing startup.
pub fn connect(config: &EmailConfig) -> EmailServiceImpl {
    match config.backend {
        EmailBackend::Smtp => match smtp(config) {
            Ok(smtp) => EmailServiceImpl::Smtp(smtp),
            Err(err) => {
                warn!(%err, "Failed to set up the smtp transport, falling back to the inert transport");
                EmailServiceImpl::Inert(inert(config))
            }
        },
        EmailBackend::Inert => EmailServiceImpl::Inert(inert(config)),
    }
}

fn smtp(config: &EmailConfig) -> anyhow::Result<SmtpEmailService> {
    let url = config
        .smtp_url
        .as_deref()
        .context("email.smtp_url is not configured")?;
    SmtpEmailService::new(url, config.from.clone())
}

fn inert(config: &EmailConfig) -> InertEmailService {
    InertEmailService::new(InertEmailServiceConfig {
        latency: Duration::from_millis(config.inert.latency_ms),
        fault_rate: config.inert.fault_rate,
    })
}

#[cfg(test)]
mod tests {
    use estudio_config::InertEmailConfig;
    use estudio_utils::assert_matches;

    use super::*;

    fn config(backend: EmailBackend, smtp_url: Option<&str>) -> EmailConfig {
        EmailConfig {
            backend,
            smtp_url: smtp_url.map(Into::into),
            from: "noreply@example.com".parse().unwrap(),
            inert: InertEmailConfig::default(),
        }
    }

    #[tokio::test]
    async fn smtp_backend_uses_the_configured_url() {
        // Arrange
        let config = config(EmailBackend::Smtp, Some("smtp://localhost:25"));

        // Act
        let transport = connect(&config);

        // Assert
        assert_matches!(transport, EmailServiceImpl::Smtp(_));
    }

    #[test]
    fn smtp_backend_without_url_degrades_to_inert() {
        // Arrange
        let config = config(EmailBackend::Smtp, None);

        // Act
        let transport = connect(&config);

        // Assert
        assert_matches!(transport, EmailServiceImpl::Inert(_));
    }

    #[test]
    fn smtp_backend_with_invalid_url_degrades_to_inert() {
        // Arrange
        let config = config(EmailBackend::Smtp, Some("definitely not a url"));

        // Act
        let transport = connect(&config);

        // Assert
        assert_matches!(transport, EmailServiceImpl::Inert(_));
    }

    #[test]
    fn inert_backend_stays_inert() {
        // Arrange
        let config = config(EmailBackend::Inert, Some("smtp://localhost:25"));

        // Act
        let transport = connect(&config);

        // Assert
        assert_matches!(transport, EmailServiceImpl::Inert(_));
    }
}
