use serde::{Deserialize, Serialize};

/// An SQS trigger event. `Records` may be absent, which is an empty batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqsBatch {
    #[serde(rename = "Records", default)]
    pub records: Option<Vec<SqsRecord>>,
}

impl SqsBatch {
    pub fn into_records(self) -> Vec<SqsRecord> {
        self.records.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqsRecord {
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "eventSourceARN", default)]
    pub event_source_arn: Option<String>,
}

impl SqsRecord {
    #[cfg(test)]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_sqs_event() {
        let event = json!({
            "Records": [{
                "messageId": "059f36b4-87a3-44ab-83d2-661975830a7d",
                "receiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a",
                "body": "{\"service\":\"api\"}",
                "attributes": { "ApproximateReceiveCount": "1" },
                "messageAttributes": {},
                "md5OfBody": "e4e68fb7bd0e697a0ae8f1bb342846b3",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:us-east-1:111122223333:alerts",
                "awsRegion": "us-east-1"
            }]
        });

        let records = serde_json::from_value::<SqsBatch>(event).unwrap().into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].message_id.as_deref(),
            Some("059f36b4-87a3-44ab-83d2-661975830a7d")
        );
        assert_eq!(records[0].body(), "{\"service\":\"api\"}");
        assert_eq!(
            records[0].event_source_arn.as_deref(),
            Some("arn:aws:sqs:us-east-1:111122223333:alerts")
        );
    }

    #[test]
    fn missing_or_null_records_is_an_empty_batch() {
        let batch: SqsBatch = serde_json::from_value(json!({})).unwrap();
        assert!(batch.into_records().is_empty());

        let batch: SqsBatch = serde_json::from_value(json!({ "Records": null })).unwrap();
        assert!(batch.into_records().is_empty());
    }

    #[test]
    fn missing_body_reads_as_empty_string() {
        let batch: SqsBatch =
            serde_json::from_value(json!({ "Records": [{ "messageId": "1" }, { "body": null }] }))
                .unwrap();
        let records = batch.into_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.body().is_empty()));
    }
}
