use log::warn;
use std::env;

pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";
pub const WEBHOOK_PARAM_VARS: [&str; 2] = ["SLACK_WEBHOOK_PARAM_NAME", "SLACK_SSM_PARAM_NAME"];

/// Where the webhook URL comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookSource {
    Direct(String),
    Parameter(String),
    Unconfigured,
}

#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    pub aws_region: Option<String>,
    pub webhook: WebhookSource,
}

impl ForwarderConfig {
    pub fn from_env() -> Self {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let direct_url = non_empty(WEBHOOK_URL_VAR);
        let param_name = WEBHOOK_PARAM_VARS.iter().find_map(|key| non_empty(*key));

        let webhook = match (direct_url, param_name) {
            (Some(url), Some(name)) => {
                warn!(
                    "Both {} and parameter {} are set; using {}",
                    WEBHOOK_URL_VAR, name, WEBHOOK_URL_VAR
                );
                WebhookSource::Direct(url)
            }
            (Some(url), None) => WebhookSource::Direct(url),
            (None, Some(name)) => WebhookSource::Parameter(name),
            (None, None) => WebhookSource::Unconfigured,
        };

        Self {
            aws_region: non_empty("AWS_REGION"),
            webhook,
        }
    }

    pub fn needs_secret_store(&self) -> bool {
        matches!(self.webhook, WebhookSource::Parameter(_))
    }
}
