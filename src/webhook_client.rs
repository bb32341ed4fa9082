use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use reqwest::Client;
use std::future::Future;

use crate::error::DeliveryError;
use crate::models::{OutboundMessage, WebhookEndpoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub body: String,
}

/// Sends one chat message to a webhook.
pub trait WebhookSender {
    fn post(
        &self,
        endpoint: &WebhookEndpoint,
        message: &OutboundMessage,
    ) -> impl Future<Output = Result<DeliveryReceipt, DeliveryError>> + Send;
}

/// Process-wide Slack webhook client; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct SlackWebhookClient {
    client: Client,
}

impl SlackWebhookClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Slack webhook client initialized");

        Ok(Self { client })
    }
}

impl WebhookSender for SlackWebhookClient {
    async fn post(
        &self,
        endpoint: &WebhookEndpoint,
        message: &OutboundMessage,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let response = self
            .client
            .post(endpoint.as_str())
            .json(message)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        debug!("Slack response status: {}", status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "Failed to read Slack response body (status {}): {}",
                    status,
                    e.without_url()
                );
                String::new()
            }
        };

        if (200..300).contains(&status) {
            Ok(DeliveryReceipt { status, body })
        } else {
            Err(DeliveryError::Rejected { status, body })
        }
    }
}

/// reqwest appends the request URL to its errors; the webhook path is a secret.
fn transport_error(e: reqwest::Error) -> DeliveryError {
    DeliveryError::Transport(e.without_url().to_string())
}
