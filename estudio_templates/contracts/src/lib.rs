use estudio_models::locale::Locale;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template in `locale`, falling back along the locale
    /// resolution chain (requested locale, default locale, built-in template).
    fn render<T: Template + 'static>(&self, template: &T, locale: Locale)
        -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        locale: Locale,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(
                mockall::predicate::eq(template),
                mockall::predicate::eq(locale),
            )
            .return_once(|_, _| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    const NAME: &'static str;
    /// Hard-coded last-resort body, used when no translation is registered.
    const FALLBACK: &'static str;
    /// Compiled-in translations, one per supported locale.
    const LOCALIZED: &'static [(Locale, &'static str)];
}

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

/// Data rendered into the contact notification email. All fields are raw
/// user or request text; escaping happens in the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub source: String,
    pub user_agent: String,
    pub timestamp: String,
    pub locale: String,
}

impl Template for ContactNotificationTemplate {
    const NAME: &'static str = "ContactNotificationTemplate";
    const FALLBACK: &'static str = r#"<!DOCTYPE html>
<html>
  <body>
    <h2>New contact message</h2>
    <p><strong>{{ name | escape }}</strong> &lt;{{ email | escape }}&gt;</p>
    {% if subject %}<p><em>{{ subject | escape }}</em></p>{% endif %}
    <p>{{ message | escape | linebreaksbr }}</p>
    <p>IP: {{ source | escape }} | {{ user_agent | escape }} | {{ timestamp | escape }}</p>
  </body>
</html>
"#;
    const LOCALIZED: &'static [(Locale, &'static str)] = &[
        (
            Locale::Es,
            include_str!("../templates/contact_notification.es.html"),
        ),
        (
            Locale::En,
            include_str!("../templates/contact_notification.en.html"),
        ),
        (
            Locale::Ja,
            include_str!("../templates/contact_notification.ja.html"),
        ),
    ];
}
