use crate::routes::PathParams;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::form_urlencoded;

/// A front-end request as the gateway sees it, with its body fully read.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`, forwarded unmodified
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub params: PathParams,
    pub request_id: String,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: PathParams::new(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// True when `key` appears in the query with a non-empty value.
    pub fn has_query_value(&self, key: &str) -> bool {
        self.query.as_deref().is_some_and(|query| {
            form_urlencoded::parse(query.as_bytes())
                .any(|(name, value)| name == key && !value.trim().is_empty())
        })
    }
}
