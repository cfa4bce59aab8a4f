use super::{BackendLocator, ClientError};
use url::Url;

pub const DEFAULT_API_NAMESPACE: &str = "/api";

/// Outcome of inspecting one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The call targets the front end's API namespace and now points at the backend.
    Backend(Url),
    /// The call is left exactly as it was.
    Untouched,
}

/// Redirects calls aimed at the front end's own API namespace to the backend.
///
/// Only the target URL is inspected; method, headers, and body of the call are
/// never looked at. Calls to any other origin, and paths outside the namespace,
/// are reported as [`Rewrite::Untouched`].
#[derive(Debug, Clone)]
pub struct RequestRewriter {
    namespace: String,
    frontend_origin: Url,
    locator: BackendLocator,
}

impl RequestRewriter {
    pub fn new(frontend_origin: Url, locator: BackendLocator) -> Self {
        Self {
            namespace: DEFAULT_API_NAMESPACE.to_string(),
            frontend_origin,
            locator,
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Result<Self, ClientError> {
        let trimmed = namespace.trim_end_matches('/');
        if !trimmed.starts_with('/') || trimmed.contains(['?', '#']) {
            return Err(ClientError::InvalidNamespace(namespace.to_string()));
        }
        self.namespace = trimmed.to_string();
        Ok(self)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn frontend_origin(&self) -> &Url {
        &self.frontend_origin
    }

    pub fn backend(&self) -> &Url {
        self.locator.resolve()
    }

    /// Segment-aware prefix check: `/api` and `/api/rooms` are inside the
    /// namespace, `/apiary` is not.
    pub fn is_under_namespace(&self, path: &str) -> bool {
        match path.strip_prefix(self.namespace.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn rewrite(&self, target: &Url) -> Result<Rewrite, ClientError> {
        if target.origin() != self.frontend_origin.origin() {
            return Ok(Rewrite::Untouched);
        }

        if !self.is_under_namespace(target.path()) {
            return Ok(Rewrite::Untouched);
        }

        let mut path_and_query = target.path().to_string();
        if let Some(query) = target.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        Ok(Rewrite::Backend(self.locator.join(&path_and_query)?))
    }
}
