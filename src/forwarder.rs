use log::{debug, error, info, warn};

use crate::error::{DecodeError, DeliveryError};
use crate::models::{OutboundMessage, ParsedPayload, WebhookEndpoint};
use crate::sqs_handler::SqsRecord;
use crate::webhook_client::{DeliveryReceipt, WebhookSender};

#[derive(Debug)]
pub struct RecordOutcome {
    pub index: usize,
    pub message_id: Option<String>,
    pub decode_error: Option<DecodeError>,
    pub delivery: Result<DeliveryReceipt, DeliveryError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivery.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }

    pub fn malformed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.decode_error.is_some()).count()
    }
}

/// Turns each queue record into a Slack alert and posts it, one at a time.
///
/// Decode and delivery failures are logged and recorded in the report; they
/// never stop the remaining records from being sent.
#[derive(Debug, Clone)]
pub struct NotificationForwarder<W> {
    sender: W,
}

impl<W: WebhookSender> NotificationForwarder<W> {
    pub fn new(sender: W) -> Self {
        Self { sender }
    }

    pub async fn forward_batch(
        &self,
        records: &[SqsRecord],
        endpoint: &WebhookEndpoint,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, record) in records.iter().enumerate() {
            let outcome = self.forward_record(index, record, endpoint).await;
            report.outcomes.push(outcome);
        }

        report
    }

    pub async fn forward_record(
        &self,
        index: usize,
        record: &SqsRecord,
        endpoint: &WebhookEndpoint,
    ) -> RecordOutcome {
        let body = record.body();
        info!(
            "Received SQS message {} ({}): {}",
            index,
            record.message_id.as_deref().unwrap_or("no message id"),
            body
        );
        if let Some(source) = &record.event_source_arn {
            debug!("Message {} came from {}", index, source);
        }

        let payload = ParsedPayload::parse(body);
        let message = OutboundMessage::render(&payload);
        let decode_error = payload.into_decode_error();
        if let Some(e) = &decode_error {
            warn!("Failed to parse JSON from SQS message {}: {}", index, e);
        }

        let delivery = self.sender.post(endpoint, &message).await;
        match &delivery {
            Ok(receipt) => debug!(
                "Slack accepted message {} with status {}: {}",
                index, receipt.status, receipt.body
            ),
            Err(e) => error!("Delivery of message {} to {} failed: {}", index, endpoint, e),
        }

        RecordOutcome {
            index,
            message_id: record.message_id.clone(),
            decode_error,
            delivery,
        }
    }
}
