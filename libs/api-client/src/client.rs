use super::{ClientError, RequestRewriter, Rewrite};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// HTTP client used by UI code to talk to the front end's API namespace.
///
/// UI code always addresses `/api/...`. Without a rewriter those calls go to
/// the front end's own origin (where the gateway proxies them); with a
/// rewriter installed they go straight to the backend.
pub struct ApiClient {
    http_client: Client,
    frontend_origin: Url,
    rewriter: Option<RequestRewriter>,
}

/// Decoded response of a JSON call. `body` is `None` for empty responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `error` field of a failure envelope, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(Value::as_str)
    }
}

impl ApiClient {
    pub fn new(frontend_origin: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self::with_http_client(http_client, frontend_origin))
    }

    pub fn with_http_client(http_client: Client, frontend_origin: Url) -> Self {
        Self {
            http_client,
            frontend_origin,
            rewriter: None,
        }
    }

    /// Install the request rewriter. Returns `false` and leaves the existing
    /// rewriter in place when one is already installed.
    pub fn install(&mut self, rewriter: RequestRewriter) -> bool {
        if let Some(existing) = &self.rewriter {
            debug!(
                namespace = existing.namespace(),
                backend = %existing.backend(),
                "Request rewriter already installed, ignoring"
            );
            return false;
        }

        info!(
            namespace = rewriter.namespace(),
            backend = %rewriter.backend(),
            "Request rewriter installed"
        );
        self.rewriter = Some(rewriter);
        true
    }

    pub fn is_rewriting(&self) -> bool {
        self.rewriter.is_some()
    }

    pub fn frontend_origin(&self) -> &Url {
        &self.frontend_origin
    }

    /// Resolve a call target. Relative targets are resolved against the front
    /// end's origin, then handed to the rewriter when one is installed.
    pub fn resolve(&self, target: &str) -> Result<Url, ClientError> {
        let url = self.absolute(target)?;

        match &self.rewriter {
            Some(rewriter) => match rewriter.rewrite(&url)? {
                Rewrite::Backend(rewritten) => Ok(rewritten),
                Rewrite::Untouched => Ok(url),
            },
            None => Ok(url),
        }
    }

    pub fn request(&self, method: Method, target: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.resolve(target)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send an already-built request. Only its URL may change; method,
    /// headers, and body go out as built.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, mut request: Request) -> Result<Response, ClientError> {
        if let Some(rewriter) = &self.rewriter {
            if let Rewrite::Backend(rewritten) = rewriter.rewrite(request.url())? {
                debug!(target = %rewritten, "Rewrote request to backend");
                *request.url_mut() = rewritten;
            }
        }

        Ok(self.http_client.execute(request).await?)
    }

    /// Issue a JSON call with an optional `Authorization` value and body.
    pub async fn send_json(
        &self,
        method: Method,
        target: &str,
        authorization: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let mut builder = self
            .http_client
            .request(method, self.absolute(target)?)
            .header(ACCEPT, "application/json");

        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.execute(builder.build()?).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body = if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        Ok(ApiResponse { status, body })
    }

    fn absolute(&self, target: &str) -> Result<Url, ClientError> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .frontend_origin
                .join(target)
                .map_err(|e| ClientError::InvalidTarget {
                    target: target.to_string(),
                    reason: e.to_string(),
                }),
            Err(e) => Err(ClientError::InvalidTarget {
                target: target.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
