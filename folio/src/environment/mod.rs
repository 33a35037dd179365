use std::sync::Arc;

use folio_config::Config;
use folio_core_contact_impl::ContactFeatureConfig;
use folio_core_health_impl::HealthFeatureConfig;
use types::{ContactFeature, Email, HealthFeature, RestServer, Template, Time};

pub mod types;

/// Wire up the rest server and all the services it depends on.
///
/// `email` is `None` if no email provider has been configured.
pub fn rest_server(config: &Config, email: Option<Email>) -> anyhow::Result<RestServer> {
    let time = Time::default();
    let template = Template::new()?;

    let contact_feature_config = ContactFeatureConfig {
        recipient: Arc::new(config.contact.recipient.clone()),
    };
    let health_feature_config = HealthFeatureConfig {
        cache_ttl: *config.health.cache_ttl,
    };

    let contact: ContactFeature =
        ContactFeature::new(time, template, email.clone(), contact_feature_config);
    let health: HealthFeature = HealthFeature::new(time, email, health_feature_config);

    Ok(RestServer::new(health, contact))
}
