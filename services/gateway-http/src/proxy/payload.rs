use crate::REQUEST_ID_HEADER;
use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use serde_json::Value;

/// Successful backend outcome: the backend's status and its JSON body as
/// received, or no body for 204.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendPayload {
    status: StatusCode,
    body: Option<Bytes>,
}

impl BackendPayload {
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    pub fn json(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Parsed view of the body, mostly for tests and logging.
    pub fn json_value(&self) -> Option<Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }

    pub fn into_response(self, request_id: &str) -> Response {
        let mut response = match self.body {
            Some(body) => {
                let mut response = Response::new(Body::from(body));
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
            None => Response::new(Body::empty()),
        };

        *response.status_mut() = self.status;
        if let Ok(value) = HeaderValue::from_str(request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}
