use estudio_config::Config;
use estudio_di::Provide;
use estudio_email_contracts::EmailService;
use estudio_templates_impl::TemplateServiceImpl;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Setting up email transport");
    let email = email::connect(&config.email);
    if let Err(err) = email.ping().await {
        warn!(%err, "Email transport is not reachable, contact submissions will fail to send");
    }

    info!("Loading notification templates");
    let template = TemplateServiceImpl::new(config.contact.templates_dir.as_deref())?;

    let config_provider = ConfigProvider::new(&config);
    let mut provider = Provider::new(config_provider, email, template);
    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
