use super::{BackendPayload, GatewayError, NormalizedResult};
use bytes::Bytes;
use http::StatusCode;
use serde::de::IgnoredAny;
use serde_json::Value;
use std::fmt::Display;

const EMPTY_OBJECT: &[u8] = b"{}";

/// Turn a received backend response into the gateway's result.
///
/// - 204 is returned as-is with no body and no parse attempt.
/// - A 2xx body is passed through byte for byte when it is JSON; empty or
///   unparsable success bodies become `{}`.
/// - Any other status is a failure carrying the backend status and either the
///   body's `message` or `fallback`.
pub fn normalize(status: StatusCode, body: &Bytes, fallback: &str) -> NormalizedResult {
    if status == StatusCode::NO_CONTENT {
        return Ok(BackendPayload::no_content());
    }

    if status.is_success() {
        let body = if is_json(body) {
            body.clone()
        } else {
            Bytes::from_static(EMPTY_OBJECT)
        };
        return Ok(BackendPayload::json(status, body));
    }

    let parsed = serde_json::from_slice::<Value>(body).ok();
    Err(GatewayError::BackendRejected {
        status,
        message: error_message(parsed.as_ref(), fallback),
    })
}

/// Message for a failed backend call: a non-empty string `message` field of
/// a JSON object body, else `fallback`.
pub fn error_message(body: Option<&Value>, fallback: &str) -> String {
    body.and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// No response was received at all: always 500, detail kept for logs only.
pub fn transport_failure(detail: impl Display) -> GatewayError {
    GatewayError::BackendUnreachable(detail.to_string())
}

fn is_json(body: &[u8]) -> bool {
    !body.iter().all(u8::is_ascii_whitespace) && serde_json::from_slice::<IgnoredAny>(body).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(text: &'static str) -> Bytes {
        Bytes::from_static(text.as_bytes())
    }

    #[test]
    fn success_body_passes_through_unchanged() {
        let raw = body(r#"{"status":"discharged","id":"a1"}"#);
        let payload = normalize(StatusCode::OK, &raw, "unused").unwrap();
        assert_eq!(payload.status(), StatusCode::OK);
        assert_eq!(payload.body(), Some(&raw));
    }

    #[test]
    fn created_status_is_kept() {
        let payload = normalize(StatusCode::CREATED, &body(r#"{"id":"p-1"}"#), "x").unwrap();
        assert_eq!(payload.status(), StatusCode::CREATED);
    }

    #[test]
    fn unparsable_success_becomes_empty_object() {
        for raw in ["<html>oops</html>", "", "   ", "{\"truncated\":"] {
            let payload = normalize(StatusCode::OK, &Bytes::from(raw), "x").unwrap();
            assert_eq!(payload.json_value(), Some(json!({})), "body {:?}", raw);
        }
    }

    #[test]
    fn no_content_skips_parsing() {
        let payload = normalize(StatusCode::NO_CONTENT, &body("not json"), "x").unwrap();
        assert_eq!(payload.status(), StatusCode::NO_CONTENT);
        assert!(payload.body().is_none());
    }

    #[test]
    fn failure_prefers_backend_message() {
        let err = normalize(
            StatusCode::NOT_FOUND,
            &body(r#"{"message":"not found"}"#),
            "Failed to fetch appointments",
        )
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn failure_falls_back_to_route_text() {
        for raw in ["Service Unavailable", "", r#"{"message":""}"#, r#"{"message":42}"#, "[]"] {
            let err = normalize(StatusCode::BAD_GATEWAY, &Bytes::from(raw), "Failed to fetch rooms")
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
            assert_eq!(err.to_string(), "Failed to fetch rooms", "body {:?}", raw);
        }
    }

    #[test]
    fn redirect_status_is_a_failure() {
        let err = normalize(StatusCode::FOUND, &Bytes::new(), "Request failed").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FOUND);
    }

    #[test]
    fn transport_failure_is_generic() {
        let err = transport_failure("error trying to connect: Connection refused (os error 111)");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
