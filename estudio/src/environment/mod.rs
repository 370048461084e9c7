use std::sync::Arc;

use estudio_api_rest::{RealIpConfig, RestServerConfig};
use estudio_config::Config;
use estudio_core_health_impl::HealthFeatureConfig;
use estudio_di::provider;
use estudio_email_impl::contact::ContactEmailServiceConfig;
use estudio_shared_impl::ratelimit::RateLimitServiceConfig;
use types::{Email, Template};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        template: Template,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Email
            ContactEmailServiceConfig,

            // Shared
            RateLimitServiceConfig,

            // Core
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email, template: Template) -> Self {
        Self {
            _cache: Default::default(),
            email,
            template,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Email
        contact_email_service_config: ContactEmailServiceConfig,

        // Shared
        rate_limit_service_config: RateLimitServiceConfig,

        // Core
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            real_ip: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
        };

        // Email
        let contact_email_service_config = ContactEmailServiceConfig {
            recipient: Arc::new(config.contact.recipient.clone()),
        };

        // Shared
        let rate_limit_service_config = RateLimitServiceConfig {
            window: config.contact.rate_limit.window.into(),
            max_requests: config.contact.rate_limit.max_requests,
            capacity: config.contact.rate_limit.capacity,
        };

        // Core
        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Email
            contact_email_service_config,

            // Shared
            rate_limit_service_config,

            // Core
            health_feature_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use estudio_di::Provide;
    use estudio_email_impl::{EmailServiceImpl, InertEmailService, InertEmailServiceConfig};
    use estudio_templates_impl::TemplateServiceImpl;
    use types::RestServer;

    use super::*;

    #[test]
    fn provide_rest_server() {
        let config =
            estudio_config::load(&[estudio_config::DEFAULT_CONFIG_PATH]).unwrap();
        let config_provider = ConfigProvider::new(&config);

        let email =
            EmailServiceImpl::Inert(InertEmailService::new(InertEmailServiceConfig::default()));
        let template = TemplateServiceImpl::new(None).unwrap();

        let mut provider = Provider::new(config_provider, email, template);
        let _: RestServer = provider.provide();
    }
}
