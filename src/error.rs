use thiserror::Error;

/// The webhook endpoint could not be resolved. Fails the whole invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no webhook endpoint configured; set SLACK_WEBHOOK_URL or SLACK_WEBHOOK_PARAM_NAME")]
    MissingEndpoint,
    #[error("webhook URL could not be read from parameter {name}")]
    SecretUnavailable { name: String },
    #[error("webhook endpoint is not a valid http(s) URL: {reason}")]
    InvalidEndpoint { reason: String },
}

impl ConfigurationError {
    /// Body returned to the caller alongside a 500 status.
    pub fn response_body(&self) -> &'static str {
        match self {
            ConfigurationError::MissingEndpoint => "Slack webhook URL is not configured",
            ConfigurationError::SecretUnavailable { .. } => {
                "Failed to retrieve Slack webhook URL from SSM"
            }
            ConfigurationError::InvalidEndpoint { .. } => "Slack webhook URL is invalid",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("parameter name is not configured")]
    MissingName,
    #[error("parameter {name} was not found")]
    NotFound { name: String },
    #[error("access denied reading parameter {name}")]
    AccessDenied { name: String },
    #[error("failed to decrypt parameter {name}: {message}")]
    Decryption { name: String, message: String },
    #[error("parameter {name} has no value")]
    EmptyValue { name: String },
    #[error("parameter store request for {name} failed: {message}")]
    Store { name: String, message: String },
}

/// A record body that is not valid JSON. Recovered by forwarding a fallback payload.
#[derive(Debug, Error)]
#[error("invalid JSON in message body: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("failed to send message to Slack: {0}")]
    Transport(String),
    #[error("Slack returned {status}: {body}")]
    Rejected { status: u16, body: String },
}
