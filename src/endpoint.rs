use log::info;

use crate::config::WebhookSource;
use crate::error::ConfigurationError;
use crate::models::WebhookEndpoint;
use crate::secret_store::{SecretResolver, SecretStore};

/// Resolves the webhook endpoint once per invocation.
pub struct EndpointResolver<S> {
    source: WebhookSource,
    secrets: Option<SecretResolver<S>>,
}

impl<S: SecretStore> EndpointResolver<S> {
    pub fn new(source: WebhookSource, secrets: Option<SecretResolver<S>>) -> Self {
        Self { source, secrets }
    }

    pub async fn resolve(&self) -> Result<WebhookEndpoint, ConfigurationError> {
        match &self.source {
            WebhookSource::Direct(url) => WebhookEndpoint::parse(url),
            WebhookSource::Parameter(name) => {
                let unavailable = || ConfigurationError::SecretUnavailable { name: name.clone() };

                let secrets = self.secrets.as_ref().ok_or_else(unavailable)?;
                let url = secrets
                    .resolve(Some(name.as_str()))
                    .await
                    .ok_or_else(unavailable)?;

                let endpoint = WebhookEndpoint::parse(&url)?;
                info!("Resolved Slack webhook {} from parameter {}", endpoint, name);
                Ok(endpoint)
            }
            WebhookSource::Unconfigured => Err(ConfigurationError::MissingEndpoint),
        }
    }
}
