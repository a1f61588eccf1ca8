//! Error mapping for provider APIs
//!
//! Converts provider error responses to our normalized ServiceError type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};

/// Map an OpenAI-style error body to a ServiceError
pub fn map_openai_error(
    status: StatusCode,
    json: &Value,
    context: &mut ErrorContext,
) -> ServiceError {
    context.service = "openai".to_string();

    let message = if let Some(error) = json.get("error") {
        if let Some(error_type) = error.get("type").and_then(|t| t.as_str()) {
            context.add("error_type", error_type);
        }

        if let Some(code) = error.get("code").and_then(|c| c.as_str()) {
            context.error_code = Some(code.to_string());
        }

        error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown OpenAI error")
    } else {
        json.get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
    };

    map_status(status, message)
}

/// Map a generic HTTP error to a ServiceError
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if context.service == "openai" {
            return map_openai_error(status, &json, context);
        }

        let message = json
            .get("message")
            .or_else(|| json.get("error"))
            .and_then(|m| m.as_str())
            .unwrap_or(body);

        return map_status(status, message);
    }

    // Fallback to status-based mapping
    let message = if body.is_empty() {
        status.to_string()
    } else if body.len() > 100 {
        format!("{}: {}...", status, crate::util::truncate_string(body, 100))
    } else {
        format!("{}: {}", status, body)
    };

    map_status(status, message)
}

fn map_status(status: StatusCode, message: impl Into<String>) -> ServiceError {
    let message = message.into();
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(message),
        StatusCode::BAD_REQUEST => ServiceError::validation(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ServiceError::timeout(message),
        StatusCode::NOT_FOUND => ServiceError::service(format!("Resource not found: {}", message)),
        _ => ServiceError::service(message),
    }
}

/// Determine if an HTTP status code indicates a retryable error
pub fn is_retryable_status(status: StatusCode) -> bool {
    is_retryable_status_code(status.as_u16())
}

pub(crate) fn is_retryable_status_code(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openai_body_is_mapped_by_status() {
        let body = json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        });
        let mut context = ErrorContext::for_service("openai");

        let err = map_openai_error(StatusCode::UNAUTHORIZED, &body, &mut context);

        assert!(matches!(err, ServiceError::Authentication(ref m) if m.contains("Incorrect API key")));
        assert_eq!(context.error_code.as_deref(), Some("invalid_api_key"));
        assert_eq!(
            context.data.get("error_type").map(String::as_str),
            Some("invalid_request_error")
        );
    }

    #[test]
    fn test_plain_text_body_falls_back_to_status() {
        let mut context = ErrorContext::for_service("proxy");
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream gone", &mut context);

        match err {
            ServiceError::Service(msg) => assert!(msg.contains("upstream gone")),
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
    }
}
