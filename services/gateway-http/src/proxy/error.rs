use crate::auth::AuthError;
use crate::REQUEST_ID_HEADER;
use axum::body::Body;
use axum::response::Response;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use serde_json::json;
use thiserror::Error;

/// Every way a forwarded call can fail. The `Display` text is what the caller
/// sees in the `error` field of the response envelope.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0} is required")]
    MissingParameter(String),

    #[error("{0} is required")]
    MissingQuery(String),

    /// A path parameter that would change which backend path is addressed.
    #[error("{0} is invalid")]
    InvalidParameter(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The backend answered with a failure status; its status is kept.
    #[error("{message}")]
    BackendRejected { status: StatusCode, message: String },

    /// No response from the backend. The detail is for logs only.
    #[error("Internal server error")]
    BackendUnreachable(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large")]
    BodyTooLarge { limit: usize },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Auth(_) => StatusCode::UNAUTHORIZED,
            GatewayError::MissingParameter(_)
            | GatewayError::MissingQuery(_)
            | GatewayError::InvalidParameter(_)
            | GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::BackendRejected { status, .. } => *status,
            GatewayError::BackendUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn to_response(&self, request_id: &str) -> Response {
        let body = json!({ "error": self.to_string() });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}
