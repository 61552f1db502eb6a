//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};
use regex::Regex;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level. Password fields in JSON
/// request bodies and revealed field values (the `value` field the reveal
/// endpoint responds with) in JSON response bodies are redacted before
/// logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    if headers.headers.get(CONTENT_TYPE) == Some(&"application/json".parse().unwrap()) {
        let display_text = redact_field(&body_text, "password");
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;

    if headers.headers.get(CONTENT_TYPE) == Some(&"application/json".parse().unwrap()) {
        let display_text = redact_field(&body_text, "value");
        log_response(&headers, &display_text);
    } else {
        log_response(&headers, &body_text);
    }

    Response::from_parts(headers, body_text.into())
}

fn redact_field(body_text: &str, field_name: &str) -> String {
    let pattern = format!("\"{field_name}\"\\s*:\\s*\"(?:[^\"\\\\]|\\\\.)*\"");

    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(body_text, format!("\"{field_name}\":\"********\""))
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The longest prefix of `body` that is at most [LOG_BODY_LENGTH_LIMIT]
/// bytes and ends on a character boundary.
fn truncate_for_log(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            truncate_for_log(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            truncate_for_log(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod redact_field_tests {
    use super::redact_field;

    #[test]
    fn redacts_password_value() {
        let body = r#"{"email":"alex@example.com","password":"hunter22"}"#;

        let redacted = redact_field(body, "password");

        assert!(!redacted.contains("hunter22"));
        assert!(redacted.contains("alex@example.com"));
    }

    #[test]
    fn redacts_password_with_escaped_quote() {
        let body = r#"{"password":"hun\"ter22"}"#;

        let redacted = redact_field(body, "password");

        assert!(!redacted.contains("ter22"));
    }

    #[test]
    fn redacts_revealed_card_number_from_response_body() {
        let body = r#"{"value":"4111111111111111"}"#;

        let redacted = redact_field(body, "value");

        assert!(!redacted.contains("4111111111111111"));
    }

    #[test]
    fn leaves_body_without_password_unchanged() {
        let body = r#"{"name":"Cash","kind":"cash"}"#;

        assert_eq!(redact_field(body, "password"), body);
    }
}
