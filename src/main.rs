use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{error, info, warn};
use serde_json::Value;
use uuid::Uuid;

mod config;
mod endpoint;
mod error;
mod forwarder;
mod models;
mod secret_store;
mod sqs_handler;
mod webhook_client;

use config::{ForwarderConfig, WebhookSource, WEBHOOK_URL_VAR};
use endpoint::EndpointResolver;
use forwarder::NotificationForwarder;
use models::HandlerResponse;
use secret_store::{SecretResolver, SecretStore, SsmSecretStore};
use sqs_handler::SqsBatch;
use webhook_client::{SlackWebhookClient, WebhookSender};

/// Clients built once per process and shared by every invocation.
pub struct ForwarderState<S, W> {
    pub resolver: EndpointResolver<S>,
    pub forwarder: NotificationForwarder<W>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    info!("Starting Slack Alert Forwarder");

    let config = ForwarderConfig::from_env();
    match &config.webhook {
        WebhookSource::Direct(_) => info!("Slack webhook taken from {}", WEBHOOK_URL_VAR),
        WebhookSource::Parameter(name) => info!("Slack webhook taken from SSM parameter {}", name),
        WebhookSource::Unconfigured => warn!("No Slack webhook configured; invocations will fail"),
    }

    let webhook_client = SlackWebhookClient::new()?;

    let secrets = if config.needs_secret_store() {
        let store = SsmSecretStore::new(config.aws_region.as_deref()).await?;
        Some(SecretResolver::new(store))
    } else {
        None
    };

    let state = ForwarderState {
        resolver: EndpointResolver::new(config.webhook.clone(), secrets),
        forwarder: NotificationForwarder::new(webhook_client),
    };
    let state = &state;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        lambda_handler(event, state).await
    }))
    .await
}

async fn lambda_handler<S, W>(
    event: LambdaEvent<Value>,
    state: &ForwarderState<S, W>,
) -> Result<HandlerResponse, Error>
where
    S: SecretStore,
    W: WebhookSender,
{
    let correlation_id = Uuid::new_v4().to_string();
    let start_time = std::time::Instant::now();

    info!(
        "Processing Lambda event with correlation_id: {} (request {})",
        correlation_id, event.context.request_id
    );

    let endpoint = match state.resolver.resolve().await {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("[{}] Cannot process batch: {}", correlation_id, e);
            return Ok(HandlerResponse::configuration_failure(&e));
        }
    };

    let batch: SqsBatch = serde_json::from_value(event.payload)
        .map_err(|e| Error::from(format!("Failed to parse SQS event: {}", e)))?;
    let records = batch.into_records();

    if records.is_empty() {
        warn!("[{}] No records to process in SQS event", correlation_id);
    } else {
        info!("[{}] Received {} SQS records to process", correlation_id, records.len());
    }

    let report = state.forwarder.forward_batch(&records, &endpoint).await;

    let undelivered: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| o.delivery.is_err())
        .map(|o| o.message_id.as_deref().unwrap_or("no message id"))
        .collect();

    info!(
        "[{}] Processing completed - Total: {}, Delivered: {}, Failed: {}, Malformed: {}, Undelivered: {:?}, Time: {}ms",
        correlation_id,
        report.attempted(),
        report.delivered(),
        report.failed(),
        report.malformed(),
        undelivered,
        start_time.elapsed().as_millis()
    );

    Ok(HandlerResponse::processed())
}
