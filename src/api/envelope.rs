//! Decoding of the `{success, data, error?, message?}` response envelope.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

const BODY_SNIPPET_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
    message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Decode a response body carrying data.
pub fn decode_data<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    check_status(status, body)?;
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(ApiError::Api(envelope.failure_message()));
    }
    envelope.data.ok_or(ApiError::MissingData)
}

/// Decode a response body where only `success` matters.
pub fn decode_ack(status: u16, body: &str) -> Result<(), ApiError> {
    check_status(status, body)?;
    if body.trim().is_empty() {
        return Ok(());
    }
    let envelope: ApiEnvelope<Value> = serde_json::from_str(body)?;
    if envelope.success {
        Ok(())
    } else {
        Err(ApiError::Api(envelope.failure_message()))
    }
}

fn check_status(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = parse_api_message(body).unwrap_or_else(|| truncate_body(body, BODY_SNIPPET_LIMIT));
    if status == 404 {
        Err(ApiError::NotFound(message))
    } else {
        Err(ApiError::Http { status, message })
    }
}

fn parse_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn truncate_body(body: &str, limit: usize) -> String {
    let mut chars = body.chars();
    let snippet: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{snippet}... [truncated]")
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_data() {
        let n: Vec<u32> = decode_data(200, r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(n, vec![1, 2]);
    }

    #[test]
    fn unsuccessful_envelope_is_api_error() {
        let err = decode_data::<Value>(200, r#"{"success": false, "error": "Invalid status"}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Api(ref m) if m == "Invalid status"));
    }

    #[test]
    fn missing_data_is_reported() {
        let err = decode_data::<Value>(200, r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }

    #[test]
    fn not_found_maps_to_its_own_variant() {
        let err = decode_data::<Value>(404, r#"{"success": false, "error": "Task not found"}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Task not found"));
    }

    #[test]
    fn http_errors_keep_status_and_snippet() {
        let body = "x".repeat(BODY_SNIPPET_LIMIT + 10);
        match decode_ack(502, &body).unwrap_err() {
            ApiError::Http { status, message } => {
                assert_eq!(status, 502);
                assert!(message.ends_with("[truncated]"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ack_accepts_empty_body_and_null_data() {
        decode_ack(204, "").unwrap();
        decode_ack(200, r#"{"success": true, "data": null}"#).unwrap();
        assert!(decode_ack(200, r#"{"success": false, "message": "nope"}"#).is_err());
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            decode_data::<Value>(200, "<html>").unwrap_err(),
            ApiError::Decode(_)
        ));
    }
}
