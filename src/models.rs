use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::error::{ConfigurationError, DecodeError};

pub const ALERT_MARKER: &str = ":rotating_light:";
pub const ALERT_HEADLINE: &str = "*Deployment Alert!*";
pub const INVALID_JSON_ERROR: &str = "Invalid JSON in SQS message";

/// A record body decoded as JSON, or the fallback that carries the raw text.
#[derive(Debug)]
pub enum ParsedPayload {
    Decoded(Value),
    Fallback { raw: String, error: DecodeError },
}

impl ParsedPayload {
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => ParsedPayload::Decoded(value),
            Err(e) => ParsedPayload::Fallback {
                raw: body.to_string(),
                error: DecodeError(e),
            },
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ParsedPayload::Decoded(value) => value.clone(),
            ParsedPayload::Fallback { raw, .. } => json!({
                "error": INVALID_JSON_ERROR,
                "raw": raw,
            }),
        }
    }

    pub fn into_decode_error(self) -> Option<DecodeError> {
        match self {
            ParsedPayload::Decoded(_) => None,
            ParsedPayload::Fallback { error, .. } => Some(error),
        }
    }
}

/// Slack incoming-webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub text: String,
}

impl OutboundMessage {
    pub fn render(payload: &ParsedPayload) -> Self {
        let value = payload.to_value();
        let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());

        Self {
            text: format!("{} {}\n```{}```", ALERT_MARKER, ALERT_HEADLINE, pretty),
        }
    }
}

/// A validated absolute http(s) webhook URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint(Url);

impl WebhookEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigurationError::InvalidEndpoint {
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidEndpoint {
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if url.host_str().is_none() {
            return Err(ConfigurationError::InvalidEndpoint {
                reason: "missing host".to_string(),
            });
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host-only form for logs; webhook paths embed the secret token.
    pub fn redacted(&self) -> String {
        let host = self.0.host_str().unwrap_or_default();
        match self.0.port() {
            Some(port) => format!("{}://{}:{}/...", self.0.scheme(), host, port),
            None => format!("{}://{}/...", self.0.scheme(), host),
        }
    }
}

impl fmt::Display for WebhookEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

pub const PROCESSED_BODY: &str = "Processed all SQS messages successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn processed() -> Self {
        Self {
            status_code: 200,
            body: PROCESSED_BODY.to_string(),
        }
    }

    pub fn configuration_failure(err: &ConfigurationError) -> Self {
        Self {
            status_code: 500,
            body: err.response_body().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_body_is_pretty_printed_in_order() {
        let payload = ParsedPayload::parse(r#"{"status":"down","service":"api"}"#);
        let message = OutboundMessage::render(&payload);

        assert_eq!(
            message.text,
            ":rotating_light: *Deployment Alert!*\n```{\n  \"status\": \"down\",\n  \"service\": \"api\"\n}```"
        );
        assert!(payload.into_decode_error().is_none());
    }

    #[test]
    fn nested_values_are_indented() {
        let payload = ParsedPayload::parse(r#"{"deploy":{"env":"prod","ok":false},"ids":[1,2]}"#);
        let text = OutboundMessage::render(&payload).text;

        assert!(text.contains("  \"deploy\": {\n    \"env\": \"prod\",\n    \"ok\": false\n  }"));
        assert!(text.contains("  \"ids\": [\n    1,\n    2\n  ]"));
    }

    #[test]
    fn scalar_json_is_still_valid_payload() {
        let payload = ParsedPayload::parse("42");
        assert!(matches!(payload, ParsedPayload::Decoded(Value::Number(_))));
        assert!(OutboundMessage::render(&payload).text.ends_with("```42```"));
    }

    #[test]
    fn malformed_body_falls_back_with_raw_text() {
        let payload = ParsedPayload::parse("not-json");
        let text = OutboundMessage::render(&payload).text;

        assert!(text.contains("\"error\": \"Invalid JSON in SQS message\""));
        assert!(text.contains("\"raw\": \"not-json\""));
        assert!(text.find("\"error\"") < text.find("\"raw\""));
        assert!(payload.into_decode_error().is_some());
    }

    #[test]
    fn empty_body_falls_back() {
        let payload = ParsedPayload::parse("");
        assert_eq!(
            payload.to_value(),
            json!({ "error": INVALID_JSON_ERROR, "raw": "" })
        );
    }

    #[test]
    fn outbound_message_serializes_as_text_object() {
        let message = OutboundMessage {
            text: "hello".to_string(),
        };
        assert_eq!(serde_json::to_value(&message).unwrap(), json!({ "text": "hello" }));
    }

    #[test]
    fn endpoint_accepts_http_and_https() {
        assert!(WebhookEndpoint::parse("https://hooks.slack.com/services/T0/B0/abc").is_ok());
        assert!(WebhookEndpoint::parse("http://127.0.0.1:8080/hook").is_ok());
    }

    #[test]
    fn endpoint_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            WebhookEndpoint::parse("hooks.slack.com/services"),
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            WebhookEndpoint::parse("ftp://hooks.slack.com/services"),
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn endpoint_display_hides_token_path() {
        let endpoint = WebhookEndpoint::parse("https://hooks.slack.com/services/T0/B0/secret").unwrap();
        assert_eq!(endpoint.to_string(), "https://hooks.slack.com/...");
        assert!(!format!("{}", endpoint).contains("secret"));
    }

    #[test]
    fn endpoint_display_keeps_explicit_port() {
        let a = WebhookEndpoint::parse("http://alerts.internal:8080/hook/one").unwrap();
        let b = WebhookEndpoint::parse("http://alerts.internal:9090/hook/one").unwrap();
        assert_eq!(a.to_string(), "http://alerts.internal:8080/...");
        assert_ne!(a.to_string(), b.to_string());

        let default_port = WebhookEndpoint::parse("https://hooks.slack.com:443/services/x").unwrap();
        assert_eq!(default_port.to_string(), "https://hooks.slack.com/...");
    }

    #[test]
    fn large_integers_are_kept_exact() {
        let payload = ParsedPayload::parse(r#"{"build":12345678901234567890123,"ratio":0.10}"#);
        let text = OutboundMessage::render(&payload).text;

        assert!(text.contains("\"build\": 12345678901234567890123"));
        assert!(!text.contains("e22"));
    }

    #[test]
    fn handler_response_uses_lambda_field_names() {
        let value = serde_json::to_value(HandlerResponse::processed()).unwrap();
        assert_eq!(
            value,
            json!({ "statusCode": 200, "body": "Processed all SQS messages successfully" })
        );

        let failure = HandlerResponse::configuration_failure(&ConfigurationError::MissingEndpoint);
        assert_eq!(failure.status_code, 500);
    }
}
