use anyhow::{anyhow, Context};
use estudio_email_contracts::{Email, EmailBody, EmailService};
use estudio_models::{contact::EmailMessageId, email_address::EmailAddress};
use estudio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    pub fn new(url: &str, from: EmailAddress) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)
            .context("Failed to construct smtp transport")?
            .build();

        Ok(Self { from, transport })
    }
}

impl EmailService for SmtpEmailService {
    async fn send(&self, email: Email) -> anyhow::Result<EmailMessageId> {
        let builder = Message::builder()
            .from(self.from.as_str().parse()?)
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject);

        let message = match email.body {
            EmailBody::Text(text) => builder.header(header::ContentType::TEXT_PLAIN).body(text)?,
            EmailBody::Html { html, text } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))?
            }
        };

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| anyhow!("Email provider rejected the message: {err}"))?;

        if !response.is_positive() {
            return Err(anyhow!(
                "Email provider rejected the message: {}",
                response.code()
            ));
        }

        let id = response
            .message()
            .next()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(EmailMessageId::from(id))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
