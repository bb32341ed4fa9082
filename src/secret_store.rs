use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::operation::get_parameter::GetParameterOutput;
use aws_sdk_ssm::Client;
use log::{debug, error, info};
use std::future::Future;

use crate::error::SecretError;

/// A key-value store holding the webhook URL.
pub trait SecretStore {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String, SecretError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SsmSecretStore {
    client: Client,
}

impl SsmSecretStore {
    pub async fn new(region: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = loader.load().await;

        let client = Client::new(&config);

        info!(
            "SSM client initialized for region: {}",
            config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "default".to_string())
        );

        Ok(Self { client })
    }
}

impl SecretStore for SsmSecretStore {
    async fn fetch(&self, name: &str) -> Result<String, SecretError> {
        debug!("Fetching parameter {} with decryption", name);

        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                classify_store_error(
                    name,
                    service_error.code(),
                    DisplayErrorContext(&service_error).to_string(),
                )
            })?;

        parameter_value(name, &output)
    }
}

/// Extracts a non-blank value from a `GetParameter` response.
pub fn parameter_value(name: &str, output: &GetParameterOutput) -> Result<String, SecretError> {
    output
        .parameter()
        .and_then(|p| p.value())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SecretError::EmptyValue {
            name: name.to_string(),
        })
}

/// Maps an SSM/KMS error code onto the secret failure taxonomy.
pub fn classify_store_error(name: &str, code: Option<&str>, message: String) -> SecretError {
    let name = name.to_string();
    match code {
        Some("ParameterNotFound") | Some("ParameterVersionNotFound") => {
            SecretError::NotFound { name }
        }
        Some("AccessDeniedException") | Some("AccessDenied") => SecretError::AccessDenied { name },
        Some(code)
            if code == "InvalidKeyId"
                || code == "InvalidCiphertextException"
                || code.starts_with("KMS") =>
        {
            SecretError::Decryption { name, message }
        }
        _ => SecretError::Store { name, message },
    }
}

/// Resolves a parameter to its value, reporting every failure as absence.
#[derive(Debug, Clone)]
pub struct SecretResolver<S> {
    store: S,
}

impl<S: SecretStore> SecretResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, name: Option<&str>) -> Option<String> {
        match self.try_resolve(name).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Failed to retrieve Slack webhook URL from SSM: {}", e);
                None
            }
        }
    }

    pub async fn try_resolve(&self, name: Option<&str>) -> Result<String, SecretError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(SecretError::MissingName)?;

        self.store.fetch(name).await
    }
}
