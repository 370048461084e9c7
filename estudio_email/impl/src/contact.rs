use std::sync::Arc;

use estudio_di::Build;
use estudio_email_contracts::{contact::ContactEmailService, Email, EmailBody, EmailService};
use estudio_models::{
    contact::{ContactMessage, EmailMessageId, SubmissionMetadata},
    email_address::EmailAddress,
    locale::Locale,
};
use estudio_templates_contracts::{ContactNotificationTemplate, TemplateService};

#[derive(Debug, Clone, Build)]
pub struct ContactEmailServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactEmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactEmailServiceConfig {
    /// The studio inbox contact notifications are delivered to.
    pub recipient: Arc<EmailAddress>,
}

impl<EmailS, TemplateS> ContactEmailService for ContactEmailServiceImpl<EmailS, TemplateS>
where
    EmailS: EmailService,
    TemplateS: TemplateService,
{
    async fn send_contact_notification(
        &self,
        message: &ContactMessage,
        metadata: &SubmissionMetadata,
    ) -> anyhow::Result<EmailMessageId> {
        let template = ContactNotificationTemplate {
            name: (*message.author.name).clone(),
            email: message.author.email.as_str().to_owned(),
            subject: message
                .subject
                .as_ref()
                .map(|subject| (**subject).clone())
                .unwrap_or_default(),
            message: (*message.content).clone(),
            source: metadata.source.to_string(),
            user_agent: metadata
                .user_agent
                .clone()
                .unwrap_or_else(|| "unknown".into()),
            timestamp: message
                .created_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            locale: metadata.locale.to_string(),
        };

        let html = self.template.render(&template, metadata.locale)?;
        let text = plain_text_body(&template);

        self.email
            .send(Email {
                recipient: (*self.config.recipient).clone().into_with_name(),
                subject: subject_line(metadata.locale, &template.name),
                body: EmailBody::Html { html, text },
                reply_to: Some(
                    message
                        .author
                        .email
                        .clone()
                        .with_name((*message.author.name).clone()),
                ),
            })
            .await
    }
}

fn subject_line(locale: Locale, name: &str) -> String {
    match locale {
        Locale::Es => format!("[Contacto] Mensaje de {name}"),
        Locale::En => format!("[Contact] Message from {name}"),
        Locale::Ja => format!("[お問い合わせ] {name}からのメッセージ"),
    }
}

fn plain_text_body(template: &ContactNotificationTemplate) -> String {
    let subject = if template.subject.is_empty() {
        String::new()
    } else {
        format!("Subject: {}\n\n", template.subject)
    };

    format!(
        "Message from {} ({}):\n\n{}{}\n\n-- \nIP: {} | {} | {}",
        template.name,
        template.email,
        subject,
        template.message,
        template.source,
        template.user_agent,
        template.timestamp,
    )
}
