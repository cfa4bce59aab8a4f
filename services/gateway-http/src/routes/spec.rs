use crate::proxy::GatewayError;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Path parameters captured from the inbound path, keyed by placeholder name.
pub type PathParams = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RouteMethod {
    pub fn as_method(&self) -> Method {
        match self {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Delete => Method::DELETE,
        }
    }

    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(RouteMethod::Get),
            Method::POST => Some(RouteMethod::Post),
            Method::PUT => Some(RouteMethod::Put),
            Method::DELETE => Some(RouteMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

fn default_requires_credential() -> bool {
    true
}

/// One forwarding rule: which front-end path maps to which backend path, and
/// what the gateway checks before dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Short name used in logs
    pub name: String,

    pub method: RouteMethod,

    /// Front-end path pattern, placeholders as whole segments: `/api/rooms/{id}`
    pub path: String,

    /// Backend path template using placeholders from `path`
    pub backend_path: String,

    #[serde(default = "default_requires_credential")]
    pub requires_credential: bool,

    #[serde(default)]
    pub forwards_body: bool,

    /// Query keys that must be present and non-empty
    #[serde(default)]
    pub required_query: Vec<String>,

    /// Message returned when the backend fails without a usable message
    pub default_error: String,
}

impl RouteSpec {
    /// A credential-protected route whose backend path mirrors `path`.
    pub fn new(name: &str, method: RouteMethod, path: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            backend_path: path.to_string(),
            requires_credential: true,
            forwards_body: false,
            required_query: Vec::new(),
            default_error: "Request failed".to_string(),
        }
    }

    pub fn backend(mut self, backend_path: &str) -> Self {
        self.backend_path = backend_path.to_string();
        self
    }

    pub fn public(mut self) -> Self {
        self.requires_credential = false;
        self
    }

    pub fn with_body(mut self) -> Self {
        self.forwards_body = true;
        self
    }

    pub fn require_query(mut self, keys: &[&str]) -> Self {
        self.required_query = keys.iter().map(|key| key.to_string()).collect();
        self
    }

    pub fn default_error(mut self, message: &str) -> Self {
        self.default_error = message.to_string();
        self
    }

    pub fn path_params(&self) -> Vec<&str> {
        self.path.split('/').filter_map(placeholder).collect()
    }

    pub fn template_params(&self) -> Vec<&str> {
        self.backend_path.split('/').filter_map(placeholder).collect()
    }

    /// Substitute captured parameters into the backend template. Values are
    /// inserted verbatim; an absent or empty value is a client error, and so is
    /// a dot segment, which would otherwise climb out of the template once the
    /// URL is parsed.
    pub fn resolve_backend_path(&self, params: &PathParams) -> Result<String, GatewayError> {
        let mut segments = Vec::new();

        for segment in self.backend_path.split('/') {
            match placeholder(segment) {
                Some(name) => {
                    let value = params
                        .get(name)
                        .filter(|value| !value.is_empty())
                        .ok_or_else(|| GatewayError::MissingParameter(name.to_string()))?;
                    if is_dot_segment(value) {
                        return Err(GatewayError::InvalidParameter(name.to_string()));
                    }
                    segments.push(value.as_str());
                }
                None => segments.push(segment),
            }
        }

        Ok(segments.join("/"))
    }
}

/// `.` or `..`, literally or with any of the dots written as `%2e`.
fn is_dot_segment(value: &str) -> bool {
    let decoded = value.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Name of a `{name}` segment, or `None` for literal segments.
pub fn placeholder(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
}
