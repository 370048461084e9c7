use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Context};
use estudio_models::locale::Locale;
use estudio_templates_contracts::{
    ContactNotificationTemplate, Template, TemplateService, BASE_TEMPLATE,
};
use tera::Tera;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    state: Arc<Tera>,
}

impl TemplateServiceImpl {
    /// Compiles the built-in templates and, if `overrides_dir` is given,
    /// replaces individual translations with `<name>.<locale>.html` files
    /// found there.
    pub fn new(overrides_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("base", BASE_TEMPLATE)?;
        register::<ContactNotificationTemplate>(&mut tera, overrides_dir)?;

        Ok(Self {
            state: Arc::new(tera),
        })
    }
}

fn register<T: Template>(tera: &mut Tera, overrides_dir: Option<&Path>) -> anyhow::Result<()> {
    tera.add_raw_template(T::NAME, T::FALLBACK)?;
    for &(locale, template) in T::LOCALIZED {
        tera.add_raw_template(&template_name(T::NAME, locale), template)?;
    }

    let Some(dir) = overrides_dir else {
        return Ok(());
    };
    for locale in Locale::ALL {
        let path = dir.join(format!("{}.{locale}.html", T::NAME));
        if !path.is_file() {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template override at {}", path.display()))?;
        tera.add_raw_template(&template_name(T::NAME, locale), &content)?;
        debug!(template = T::NAME, %locale, "loaded template override");
    }
    Ok(())
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template + 'static>(&self, template: &T, locale: Locale) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;

        let candidates = [
            template_name(T::NAME, locale),
            template_name(T::NAME, Locale::default()),
            T::NAME.to_owned(),
        ];
        let name = candidates
            .iter()
            .find(|candidate| {
                self.state
                    .get_template_names()
                    .any(|registered| registered == candidate.as_str())
            })
            .ok_or_else(|| anyhow!("No template registered for {}", T::NAME))?;

        self.state.render(name, &context).map_err(Into::into)
    }
}

fn template_name(name: &str, locale: Locale) -> String {
    format!("{name}.{locale}")
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    fn template() -> ContactNotificationTemplate {
        ContactNotificationTemplate {
            name: "Ana Gómez".into(),
            email: "ana@example.com".into(),
            subject: "Nueva web".into(),
            message: "Hola,\nnecesito una web.".into(),
            source: "203.0.113.7".into(),
            user_agent: "Mozilla/5.0".into(),
            timestamp: "2025-01-01 12:00:00 UTC".into(),
            locale: "es".into(),
        }
    }

    #[test]
    fn renders_every_locale() {
        // Arrange
        let sut = TemplateServiceImpl::new(None).unwrap();

        // Act + Assert
        for (locale, heading) in [
            (Locale::Es, "Nuevo mensaje de contacto"),
            (Locale::En, "New contact message"),
            (Locale::Ja, "新しいお問い合わせ"),
        ] {
            let html = sut.render(&template(), locale).unwrap();
            assert!(html.contains(heading));
            assert!(html.contains("ana@example.com"));
        }
    }

    #[test]
    fn escapes_user_supplied_markup() {
        // Arrange
        let sut = TemplateServiceImpl::new(None).unwrap();
        let template = ContactNotificationTemplate {
            message: "please visit <script>alert(1)</script> soon".into(),
            ..template()
        };

        // Act
        let html = sut.render(&template, Locale::En).unwrap();

        // Assert
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn renders_line_breaks() {
        // Arrange
        let sut = TemplateServiceImpl::new(None).unwrap();

        // Act
        let html = sut.render(&template(), Locale::Es).unwrap();

        // Assert
        assert!(html.contains("Hola,<br>"));
    }

    #[test]
    fn falls_back_to_builtin_template_without_translations() {
        // Arrange: an engine that only knows the hard-coded template
        let mut tera = Tera::default();
        tera.add_raw_template(
            ContactNotificationTemplate::NAME,
            ContactNotificationTemplate::FALLBACK,
        )
        .unwrap();
        let sut = TemplateServiceImpl {
            state: Arc::new(tera),
        };

        // Act
        let html = sut.render(&template(), Locale::Ja).unwrap();

        // Assert
        assert!(html.contains("New contact message"));
    }

    #[test]
    fn unregistered_template_is_an_error() {
        // Arrange
        #[derive(Serialize)]
        struct OrphanTemplate;
        impl Template for OrphanTemplate {
            const NAME: &'static str = "OrphanTemplate";
            const FALLBACK: &'static str = "";
            const LOCALIZED: &'static [(Locale, &'static str)] = &[];
        }
        let sut = TemplateServiceImpl::new(None).unwrap();

        // Act
        let result = sut.render(&OrphanTemplate, Locale::Es);

        // Assert
        result.unwrap_err();
    }

    #[test]
    fn override_replaces_builtin_translation() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("estudio-templates-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ContactNotificationTemplate.en.html");
        std::fs::write(&path, "<p>Custom override for {{ name | escape }}</p>").unwrap();

        // Act
        let sut = TemplateServiceImpl::new(Some(&dir)).unwrap();
        let html = sut.render(&template(), Locale::En).unwrap();

        // Assert
        assert!(html.contains("Custom override for Ana Gómez"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
