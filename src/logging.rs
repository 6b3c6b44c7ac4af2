//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// The maximum number of body bytes logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Password fields in JSON request bodies are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    let is_json = headers
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        let display_text = redact_password(&body_text, "password");
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

/// Replace the string value of `field_name` in a JSON body with asterisks.
///
/// The scan is textual rather than a full JSON parse, so a password that
/// contains an escaped double quote is only redacted up to the escape.
fn redact_password(body_text: &str, field_name: &str) -> String {
    let needle = format!("\"{field_name}\"");

    let field_pos = match body_text.find(&needle) {
        Some(pos) => pos + needle.len(),
        None => return body_text.to_string(),
    };

    let colon_pos = match body_text[field_pos..].find(':') {
        Some(pos) => field_pos + pos + 1,
        None => return body_text.to_string(),
    };

    let value_start = match body_text[colon_pos..].find('"') {
        Some(pos) => colon_pos + pos + 1,
        None => return body_text.to_string(),
    };

    let value_len = match body_text[value_start..].find('"') {
        Some(len) => len,
        None => return body_text.to_string(),
    };

    format!(
        "{}********{}",
        &body_text[..value_start],
        &body_text[value_start + value_len..]
    )
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

/// Truncate `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting
/// a multi-byte character.
fn truncated(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT;

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Received request: {headers:#?}\nbody: {:}...", truncated(body));
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Sending response: {headers:#?}\nbody: {:}...", truncated(body));
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod truncation_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, log_request, truncated};

    #[test]
    fn truncation_backs_up_to_a_char_boundary() {
        // 'á' is two bytes, occupying bytes 63..65, so the limit of 64 falls
        // inside it.
        let body = format!("{}á y más texto", "x".repeat(63));

        let shortened = truncated(&body);

        assert_eq!(shortened, "x".repeat(63));
    }

    #[test]
    fn truncation_keeps_whole_characters_at_the_limit() {
        let body = format!("{}aá y más texto", "x".repeat(62));

        let shortened = truncated(&body);

        assert_eq!(shortened.len(), LOG_BODY_LENGTH_LIMIT - 1);
        assert!(shortened.ends_with('a'));
    }

    #[test]
    fn long_bodies_with_multibyte_characters_log_without_panicking() {
        let (headers, _) = axum::http::Request::builder()
            .uri("/api/transactions")
            .body(())
            .unwrap()
            .into_parts();
        // The prefix is 13 bytes and the padding 50, leaving 'ó' straddling
        // byte 64.
        let body = format!(r#"{{"category":"{}ón de ejemplo"}}"#, "x".repeat(50));

        log_request(&headers, &body);
    }
}
